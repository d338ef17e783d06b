use crate::models::{CountryRecord, StateRecord};
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn save_csv<T: Serialize, P: AsRef<Path>>(rows: &[T], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

fn save_json<T: Serialize, P: AsRef<Path>>(rows: &[T], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save state rows as CSV, using the upstream field names as header.
pub fn save_states_csv<P: AsRef<Path>>(states: &[StateRecord], path: P) -> Result<()> {
    save_csv(states, path)
}

/// Save state rows as a pretty JSON array.
pub fn save_states_json<P: AsRef<Path>>(states: &[StateRecord], path: P) -> Result<()> {
    save_json(states, path)
}

pub fn save_countries_csv<P: AsRef<Path>>(countries: &[CountryRecord], path: P) -> Result<()> {
    save_csv(countries, path)
}

pub fn save_countries_json<P: AsRef<Path>>(countries: &[CountryRecord], path: P) -> Result<()> {
    save_json(countries, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let states = vec![StateRecord {
            id: 35,
            state_code: "SP".into(),
            state_name: "São Paulo".into(),
            confirmed_cases: 1200.0,
            deaths: 80.0,
            suspected_cases: 0.0,
            discarded_cases: 10.0,
            updated_at: "2020-05-20T12:00:00.000Z".into(),
        }];
        save_states_csv(&states, &csvp).unwrap();
        save_states_json(&states, &jsonp).unwrap();

        let csv = std::fs::read_to_string(&csvp).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("uid,uf,state,cases,deaths,suspects,refuses,datetime")
        );
        assert!(lines.next().unwrap().starts_with("35,SP,São Paulo,1200,80,0,10,"));

        let back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&jsonp).unwrap()).unwrap();
        assert_eq!(back[0]["uf"], "SP");
        assert_eq!(back[0]["cases"], 1200);
    }
}
