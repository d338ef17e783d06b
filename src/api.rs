//! Synchronous client for the **COVID-19 Brazil API** (`/api/report/v1`).
//!
//! Four read operations and one simulated write. Every read returns a tagged
//! `Result`; deciding whether a failure should reach the user is left to the
//! caller (see [`crate::service::Service`] for the "always hand back something"
//! behaviour pages want).
//!
//! ### Endpoints
//! - `GET {base}` → `{"data": [state, ...]}`
//! - `GET {base}/brazil/uf/{uf}` → bare state object (or `{"error": ...}`)
//! - `GET {base}/brazil/{YYYYMMDD}` → `{"data": ...}`
//! - `GET {base}/countries` → `{"data": [country, ...]}`
//!
//! Typical usage:
//! ```no_run
//! # use covid_painel::Client;
//! let client = Client::default();
//! let states = client.fetch_all_states()?;
//! println!("{} states", states.len());
//! # Ok::<(), covid_painel::error::ApiError>(())
//! ```
use crate::error::ApiError;
use crate::models::{
    CountryRecord, HistoricalRecord, StateRecord, StateSelection, SubmitReceipt, SubmittedForm,
    compact_date,
};
use chrono::NaiveDate;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://covid19-brazil-api.now.sh/api/report/v1";
/// Upper bound for a whole request; exceeding it is a transport failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Artificial latency of the simulated form submission.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(800);

const STATES_PATH: &str = "";
const COUNTRIES_PATH: &str = "/countries";

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    pub submit_delay: Duration,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT) // total request timeout
            .connect_timeout(Duration::from_secs(5))
            .redirect(Policy::limited(5))
            .user_agent(concat!("covid_painel/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            submit_delay: SUBMIT_DELAY,
            http,
        }
    }
}

impl Client {
    /// Client against another deployment of the same API (mirrors, local fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        log::debug!("GET {url}");
        let resp = self.http.get(&url).send().map_err(|source| ApiError::Transport {
            path: display_path(path),
            source,
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                path: display_path(path),
                status,
            });
        }
        resp.json::<Value>().map_err(|e| {
            if e.is_decode() {
                ApiError::Decode {
                    path: display_path(path),
                    reason: e.to_string(),
                }
            } else {
                ApiError::Transport {
                    path: display_path(path),
                    source: e,
                }
            }
        })
    }

    /// All 27 federative units, in upstream order.
    pub fn fetch_all_states(&self) -> Result<Vec<StateRecord>, ApiError> {
        let v = self.get_json(STATES_PATH)?;
        let states = parse_states(&v)?;
        log::debug!("fetched {} states", states.len());
        Ok(states)
    }

    /// One state by code. The code is lowercased for the request.
    /// `Ok(None)` when upstream does not know the code.
    pub fn fetch_state(&self, code: &str) -> Result<Option<StateRecord>, ApiError> {
        let code = code.trim().to_lowercase();
        if code.is_empty() {
            return Ok(None);
        }
        let path = format!("/brazil/uf/{code}");
        let v = self.get_json(&path)?;
        parse_state(&v, &path)
    }

    /// Detail for a selection. [`StateSelection::AllStates`] has no single record,
    /// so it yields `Ok(None)` without touching the network.
    pub fn fetch_state_data(
        &self,
        selection: &StateSelection,
    ) -> Result<Option<StateRecord>, ApiError> {
        match selection {
            StateSelection::AllStates => Ok(None),
            StateSelection::Specific(code) => self.fetch_state(code),
        }
    }

    /// Brazil-wide figures for `date`, requested as `/brazil/YYYYMMDD`.
    pub fn fetch_historical_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<HistoricalRecord>, ApiError> {
        let path = format!("/brazil/{}", compact_date(date));
        let v = self.get_json(&path)?;
        parse_historical(&v, date, &path)
    }

    pub fn fetch_countries(&self) -> Result<Vec<CountryRecord>, ApiError> {
        let v = self.get_json(COUNTRIES_PATH)?;
        let countries = parse_countries(&v)?;
        log::debug!("fetched {} countries", countries.len());
        Ok(countries)
    }

    /// Simulated write: waits `submit_delay`, then echoes the form back.
    /// There is no backend; this never fails.
    pub fn submit_form(&self, form: SubmittedForm) -> SubmitReceipt {
        std::thread::sleep(self.submit_delay);
        log::info!("form data submitted: {:?}", form);
        SubmitReceipt {
            success: true,
            data: form,
        }
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".into()
    } else {
        path.to_string()
    }
}

fn format_err(path: &str, reason: impl Into<String>) -> ApiError {
    ApiError::Format {
        path: display_path(path),
        reason: reason.into(),
    }
}

/// Unwrap the `{"data": ...}` envelope used by the collection endpoints.
fn data_envelope<'a>(v: &'a Value, path: &str) -> Result<&'a Value, ApiError> {
    match v.get("data") {
        Some(Value::Null) | None => Err(format_err(path, "missing `data` envelope")),
        Some(data) => Ok(data),
    }
}

fn decode<T: DeserializeOwned>(v: &Value, path: &str, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(v.clone()).map_err(|e| format_err(path, format!("parse {what}: {e}")))
}

fn data_array<T: DeserializeOwned>(v: &Value, path: &str, what: &str) -> Result<Vec<T>, ApiError> {
    let data = data_envelope(v, path)?;
    if !data.is_array() {
        return Err(format_err(path, "`data` is not an array"));
    }
    decode(data, path, what)
}

/// Parse the root endpoint response.
pub fn parse_states(v: &Value) -> Result<Vec<StateRecord>, ApiError> {
    data_array(v, STATES_PATH, "states")
}

/// Parse the `/countries` response.
pub fn parse_countries(v: &Value) -> Result<Vec<CountryRecord>, ApiError> {
    data_array(v, COUNTRIES_PATH, "countries")
}

/// Parse a `/brazil/uf/{uf}` response, which is *not* enveloped.
pub fn parse_state(v: &Value, path: &str) -> Result<Option<StateRecord>, ApiError> {
    let obj = v
        .as_object()
        .ok_or_else(|| format_err(path, "state response is not an object"))?;
    if obj.is_empty() || obj.contains_key("error") {
        return Ok(None);
    }
    decode(v, path, "state").map(Some)
}

/// Parse a `/brazil/{YYYYMMDD}` response.
///
/// Upstream answers with per-state rows for that day; those are summed into one
/// national record. A single object is taken as already aggregated.
pub fn parse_historical(
    v: &Value,
    date: NaiveDate,
    path: &str,
) -> Result<Option<HistoricalRecord>, ApiError> {
    let data = data_envelope(v, path)?;
    let requested = date.format("%Y-%m-%d").to_string();
    match data {
        Value::Array(rows) if rows.is_empty() => Ok(None),
        Value::Array(_) => {
            let rows: Vec<HistoricalRecord> = decode(data, path, "historical rows")?;
            let total = rows.into_iter().fold(
                HistoricalRecord {
                    date: requested,
                    cases: 0.0,
                    confirmed_cases: 0.0,
                    deaths: 0.0,
                    recovered: 0.0,
                },
                |mut acc, r| {
                    acc.cases += r.cases;
                    acc.confirmed_cases += r.confirmed_cases;
                    acc.deaths += r.deaths;
                    acc.recovered += r.recovered;
                    acc
                },
            );
            Ok(Some(total))
        }
        Value::Object(_) => {
            let mut rec: HistoricalRecord = decode(data, path, "historical record")?;
            if rec.date.is_empty() {
                rec.date = requested;
            }
            Ok(Some(rec))
        }
        _ => Err(format_err(path, "`data` is neither an object nor an array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_joins_without_double_slash() {
        let c = Client::default().with_base_url("http://localhost:1/api/");
        assert_eq!(c.url("/countries"), "http://localhost:1/api/countries");
        assert_eq!(c.url(""), "http://localhost:1/api");
    }

    #[test]
    fn envelope_is_required() {
        let err = parse_states(&json!([{"uf": "SP"}])).unwrap_err();
        assert!(err.is_format());
        let err = parse_countries(&json!({"data": null})).unwrap_err();
        assert!(err.is_format());
        let err = parse_countries(&json!({"data": {"country": "Brazil"}})).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn historical_rows_are_summed() {
        let d = NaiveDate::from_ymd_opt(2020, 3, 18).unwrap();
        let v = json!({"data": [
            {"uf": "SP", "cases": 100, "deaths": 3},
            {"uf": "RJ", "cases": "50", "deaths": null}
        ]});
        let rec = parse_historical(&v, d, "/brazil/20200318").unwrap().unwrap();
        assert_eq!(rec.date, "2020-03-18");
        assert_eq!(rec.cases, 150.0);
        assert_eq!(rec.deaths, 3.0);
        assert_eq!(rec.recovered, 0.0);
    }
}
