//! Live API tests. Run with: `cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use chrono::NaiveDate;
use covid_painel::{Client, StateSelection};

#[test]
fn fetch_all_states() {
    let states = Client::default().fetch_all_states().unwrap();
    assert_eq!(states.len(), 27);
    assert!(states.iter().any(|s| s.state_code == "SP"));
    assert!(states.iter().all(|s| s.confirmed_cases.is_finite()));
}

#[test]
fn fetch_one_state_and_unknown() {
    let cli = Client::default();
    let sp = cli
        .fetch_state_data(&StateSelection::Specific("SP".into()))
        .unwrap()
        .unwrap();
    assert_eq!(sp.state_code, "SP");
    assert_eq!(cli.fetch_state("xx").unwrap(), None);
}

#[test]
fn fetch_countries() {
    let countries = Client::default().fetch_countries().unwrap();
    assert!(!countries.is_empty());
    assert!(countries.iter().any(|c| c.country_name == "Brazil"));
}

#[test]
fn fetch_historical_day() {
    let d = NaiveDate::from_ymd_opt(2020, 5, 20).unwrap();
    let day = Client::default().fetch_historical_by_date(d).unwrap().unwrap();
    assert_eq!(day.date, "2020-05-20");
    assert!(day.cases > 0.0);
}
