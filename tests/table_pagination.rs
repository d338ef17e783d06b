use covid_painel::models::{CountryRecord, StateRecord};
use covid_painel::pages::{country_columns, state_columns};
use covid_painel::table::{DataTable, LOADING_ROWS, NO_RESULTS, TableBody, page_buttons};
use num_format::Locale;

fn countries(n: usize) -> Vec<CountryRecord> {
    (0..n)
        .map(|i| CountryRecord {
            country_name: format!("Country {i}"),
            confirmed_cases: i as f64,
            reported_cases: i as f64,
            deaths: 0.0,
            recovered: 0.0,
            updated_at: String::new(),
        })
        .collect()
}

fn table(rows: Vec<CountryRecord>) -> DataTable<CountryRecord> {
    DataTable::new(country_columns(), rows).with_search_field("country")
}

#[test]
fn twenty_three_rows_make_three_pages() {
    let mut t = table(countries(23));
    assert_eq!(t.total_pages(), 3);
    assert_eq!(t.page_rows().len(), 10);
    t.go_to_page(3);
    assert_eq!(t.page(), 3);
    assert_eq!(t.page_rows().len(), 3);
    assert_eq!(t.page_rows()[0].country_name, "Country 20");

    let p = t.pagination().unwrap();
    assert!(p.prev_enabled);
    assert!(!p.next_enabled);
    assert_eq!(p.buttons, vec![1, 2, 3]);
}

#[test]
fn page_is_clamped() {
    let mut t = table(countries(23));
    t.go_to_page(99);
    assert_eq!(t.page(), 3);
    t.next_page();
    assert_eq!(t.page(), 3);
    t.go_to_page(0);
    assert_eq!(t.page(), 1);
    t.prev_page();
    assert_eq!(t.page(), 1);
}

#[test]
fn single_page_has_no_pagination() {
    let t = table(countries(10));
    assert_eq!(t.total_pages(), 1);
    assert!(t.pagination().is_none());
}

#[test]
fn search_is_case_insensitive_and_resets_page() {
    let mut rows = countries(15);
    rows.push(CountryRecord {
        country_name: "Brazil".into(),
        ..rows[0].clone()
    });
    let mut t = table(rows);
    t.go_to_page(2);
    t.set_query("bra");
    assert_eq!(t.page(), 1);
    let hits = t.filtered();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].country_name, "Brazil");

    t.set_query("");
    assert_eq!(t.filtered().len(), 16);
}

#[test]
fn numeric_field_search_uses_digits() {
    let mut rows = countries(3);
    rows[1].reported_cases = 12999.0;
    let mut t = DataTable::new(country_columns(), rows).with_search_field("cases");
    t.set_query("999");
    assert_eq!(t.filtered().len(), 1);
}

#[test]
fn no_match_renders_single_spanning_row() {
    let mut t = table(countries(5));
    t.set_query("zzz");
    let r = t.render(false, &Locale::pt);
    match &r.body {
        TableBody::Empty { message, colspan } => {
            assert_eq!(*message, NO_RESULTS);
            assert_eq!(*colspan, country_columns().len());
        }
        other => panic!("expected empty body, got {other:?}"),
    }
    assert_eq!(r.row_count(), 1);
    assert!(r.to_text(false).contains(NO_RESULTS));
}

#[test]
fn loading_shows_fixed_placeholder_rows() {
    for n in [0, 3, 40] {
        let r = table(countries(n)).render(true, &Locale::pt);
        assert_eq!(r.body, TableBody::Loading { rows: LOADING_ROWS });
        assert_eq!(r.row_count(), LOADING_ROWS);
    }
}

#[test]
fn state_cells_are_formatted() {
    let s = StateRecord {
        id: 35,
        state_code: "SP".into(),
        state_name: "São Paulo".into(),
        confirmed_cases: 1234567.0,
        deaths: 10.0,
        suspected_cases: 0.0,
        discarded_cases: 0.0,
        updated_at: "2020-05-20T22:45:31.000Z".into(),
    };
    let t = DataTable::new(state_columns(), vec![s]);
    let r = t.render(false, &Locale::pt);
    let TableBody::Rows(rows) = &r.body else {
        panic!("expected rows");
    };
    assert_eq!(r.headers[0], "Estado");
    assert_eq!(rows[0][2].text, "1.234.567");
    assert_eq!(rows[0][4].text, "N/A");
    assert!(rows[0][5].text.starts_with("20 de maio de 2020"));
}

#[test]
fn buttons_window_around_current() {
    assert_eq!(page_buttons(1, 3), vec![1, 2, 3]);
    assert_eq!(page_buttons(1, 9).len(), 5);
    let mid = page_buttons(5, 9);
    assert_eq!(mid.len(), 5);
    assert!(mid.contains(&5));
}
