use covid_painel::models::CountryRecord;
use covid_painel::storage::{save_countries_csv, save_countries_json};
use std::fs;
use tempfile::tempdir;

#[test]
fn countries_to_csv_and_json() {
    let dir = tempdir().unwrap();
    let csvp = dir.path().join("countries.csv");
    let jsonp = dir.path().join("countries.json");
    let rows = vec![
        CountryRecord {
            country_name: "Brazil".into(),
            confirmed_cases: 1200.0,
            reported_cases: 1000.0,
            deaths: 50.0,
            recovered: 300.0,
            updated_at: "2020-04-05T20:35:37.000Z".into(),
        },
        CountryRecord {
            country_name: "Chile, Republic of".into(),
            confirmed_cases: 1.5,
            reported_cases: 0.0,
            deaths: 0.0,
            recovered: 0.0,
            updated_at: String::new(),
        },
    ];
    save_countries_csv(&rows, &csvp).unwrap();
    save_countries_json(&rows, &jsonp).unwrap();

    let mut rdr = csv::Reader::from_path(&csvp).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["country", "confirmed", "cases", "deaths", "recovered", "updated_at"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[1][0], "Chile, Republic of");
    assert_eq!(&records[1][1], "1.5");

    let back: Vec<CountryRecord> =
        serde_json::from_str(&fs::read_to_string(&jsonp).unwrap()).unwrap();
    assert_eq!(back, rows);
}
