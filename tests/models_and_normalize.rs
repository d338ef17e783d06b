use covid_painel::models::{StateRecord, StateSelection, compact_date, normalize_count};
use serde_json::json;

#[test]
fn normalize_is_total_and_finite() {
    let inputs = [
        json!(null),
        json!(""),
        json!("   "),
        json!("abc"),
        json!("12abc"),
        json!("Infinity"),
        json!(true),
        json!([1, 2]),
        json!({"n": 1}),
        json!(1e308),
        json!(-4),
        json!("3.5"),
    ];
    for v in &inputs {
        assert!(normalize_count(v).is_finite(), "{v} gave a non-finite count");
    }
}

#[test]
fn normalize_examples() {
    assert_eq!(normalize_count(&json!(null)), 0.0);
    assert_eq!(normalize_count(&json!("abc")), 0.0);
    assert_eq!(normalize_count(&json!("42")), 42.0);
    assert_eq!(normalize_count(&json!(" 42 ")), 42.0);
    assert_eq!(normalize_count(&json!(42)), 42.0);
    assert_eq!(normalize_count(&json!(-7)), -7.0);
    assert_eq!(normalize_count(&json!(false)), 0.0);
    assert_eq!(normalize_count(&json!("Infinity")), 0.0);
}

#[test]
fn missing_fields_default() {
    let s: StateRecord = serde_json::from_value(json!({"uf": "AC"})).unwrap();
    assert_eq!(s.state_code, "AC");
    assert_eq!(s.id, 0);
    assert_eq!(s.state_name, "");
    assert_eq!(s.confirmed_cases, 0.0);
    assert_eq!(s.updated_at, "");
}

#[test]
fn serializes_with_upstream_names() {
    let s: StateRecord =
        serde_json::from_value(json!({"uid": 12, "uf": "AC", "state": "Acre", "cases": "25"}))
            .unwrap();
    let back = serde_json::to_value(&s).unwrap();
    assert_eq!(back["uf"], "AC");
    assert_eq!(back["cases"], 25);
    assert_eq!(back["suspects"], 0);
}

#[test]
fn state_selection_parsing() {
    assert_eq!("all".parse::<StateSelection>().unwrap(), StateSelection::AllStates);
    assert_eq!("_all".parse::<StateSelection>().unwrap(), StateSelection::AllStates);
    assert_eq!(
        "sp".parse::<StateSelection>().unwrap(),
        StateSelection::Specific("SP".into())
    );
    assert!("".parse::<StateSelection>().is_err());
    assert_eq!(StateSelection::Specific("RJ".into()).code(), Some("RJ"));
    assert_eq!(StateSelection::AllStates.code(), None);
    assert_eq!(StateSelection::AllStates.to_string(), "all");
}

#[test]
fn compact_dates() {
    let d = chrono::NaiveDate::from_ymd_opt(2020, 3, 18).unwrap();
    assert_eq!(compact_date(d), "20200318");
}
