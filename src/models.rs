use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Coerce a possibly-missing or malformed count into a finite number.
///
/// This is the single numeric rule shared by every record type:
/// numbers pass through (negatives included), strings are parsed,
/// and anything that does not yield a finite number becomes `0`.
///
/// ```
/// use covid_painel::models::normalize_count;
/// use serde_json::json;
///
/// assert_eq!(normalize_count(&json!(null)), 0.0);
/// assert_eq!(normalize_count(&json!("42")), 42.0);
/// assert_eq!(normalize_count(&json!("n/a")), 0.0);
/// assert_eq!(normalize_count(&json!(-3)), -3.0);
/// ```
pub fn normalize_count(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        // An empty string is numerically zero upstream; trim like a number input would.
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Serde helper: read any JSON value and normalize it with [`normalize_count`].
/// Combine with `#[serde(default)]` so absent fields also become `0`.
fn de_count<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().map(normalize_count).unwrap_or(0.0))
}

/// Serde helper: write whole counts as integers (`10`, not `10.0`).
fn ser_count<S>(v: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*v as i64)
    } else {
        serializer.serialize_f64(*v)
    }
}

/// Serde helper: accept `null` for text fields.
fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = de_count(deserializer)?;
    Ok(if v >= 0.0 && v <= u32::MAX as f64 { v as u32 } else { 0 })
}

/// One Brazilian state as reported by the `/api/report/v1` root endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(rename = "uid", default, deserialize_with = "de_id")]
    pub id: u32,
    #[serde(rename = "uf", default, deserialize_with = "de_text")]
    pub state_code: String,
    #[serde(rename = "state", default, deserialize_with = "de_text")]
    pub state_name: String,
    #[serde(
        rename = "cases",
        default,
        deserialize_with = "de_count",
        serialize_with = "ser_count"
    )]
    pub confirmed_cases: f64,
    #[serde(default, deserialize_with = "de_count", serialize_with = "ser_count")]
    pub deaths: f64,
    #[serde(
        rename = "suspects",
        default,
        deserialize_with = "de_count",
        serialize_with = "ser_count"
    )]
    pub suspected_cases: f64,
    #[serde(
        rename = "refuses",
        default,
        deserialize_with = "de_count",
        serialize_with = "ser_count"
    )]
    pub discarded_cases: f64,
    /// ISO-8601 timestamp as sent upstream; kept verbatim.
    #[serde(rename = "datetime", default, deserialize_with = "de_text")]
    pub updated_at: String,
}

/// One country from the `/countries` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(rename = "country", default, deserialize_with = "de_text")]
    pub country_name: String,
    #[serde(
        rename = "confirmed",
        default,
        deserialize_with = "de_count",
        serialize_with = "ser_count"
    )]
    pub confirmed_cases: f64,
    #[serde(
        rename = "cases",
        default,
        deserialize_with = "de_count",
        serialize_with = "ser_count"
    )]
    pub reported_cases: f64,
    #[serde(default, deserialize_with = "de_count", serialize_with = "ser_count")]
    pub deaths: f64,
    #[serde(default, deserialize_with = "de_count", serialize_with = "ser_count")]
    pub recovered: f64,
    #[serde(default, deserialize_with = "de_text")]
    pub updated_at: String,
}

/// Brazil-wide figures for a single day (`/brazil/{YYYYMMDD}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(default, deserialize_with = "de_text")]
    pub date: String,
    #[serde(default, deserialize_with = "de_count", serialize_with = "ser_count")]
    pub cases: f64,
    #[serde(
        rename = "confirmed",
        default,
        deserialize_with = "de_count",
        serialize_with = "ser_count"
    )]
    pub confirmed_cases: f64,
    #[serde(default, deserialize_with = "de_count", serialize_with = "ser_count")]
    pub deaths: f64,
    #[serde(default, deserialize_with = "de_count", serialize_with = "ser_count")]
    pub recovered: f64,
}

/// A validated manual entry, in the shape the (simulated) write endpoint would accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedForm {
    #[serde(rename = "state")]
    pub state_name: String,
    #[serde(serialize_with = "ser_count")]
    pub cases: f64,
    #[serde(serialize_with = "ser_count")]
    pub confirmed: f64,
    #[serde(serialize_with = "ser_count")]
    pub deaths: f64,
    #[serde(serialize_with = "ser_count")]
    pub recovered: f64,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
}

/// Result of the simulated submission: the input echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub success: bool,
    pub data: SubmittedForm,
}

/// Which state(s) the States page is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateSelection {
    /// Every state, straight from the collection endpoint.
    AllStates,
    /// A single state by its two-letter code (case-insensitive).
    Specific(String),
}

impl StateSelection {
    /// The code to request, if this selection names one state.
    pub fn code(&self) -> Option<&str> {
        match self {
            StateSelection::Specific(code) => Some(code.as_str()),
            _ => None,
        }
    }
}

impl FromStr for StateSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty state selection".into());
        }
        Ok(if s.eq_ignore_ascii_case("all") || s == "_all" {
            StateSelection::AllStates
        } else {
            StateSelection::Specific(s.to_ascii_uppercase())
        })
    }
}

impl fmt::Display for StateSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSelection::AllStates => f.write_str("all"),
            StateSelection::Specific(code) => f.write_str(code),
        }
    }
}

/// Upstream's compact date form, e.g. `2020-03-18` → `20200318`.
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_rule() {
        assert_eq!(normalize_count(&json!(null)), 0.0);
        assert_eq!(normalize_count(&json!("abc")), 0.0);
        assert_eq!(normalize_count(&json!("42")), 42.0);
        assert_eq!(normalize_count(&json!(" 7 ")), 7.0);
        assert_eq!(normalize_count(&json!("")), 0.0);
        assert_eq!(normalize_count(&json!("NaN")), 0.0);
        assert_eq!(normalize_count(&json!("inf")), 0.0);
        assert_eq!(normalize_count(&json!(-3)), -3.0);
        assert_eq!(normalize_count(&json!(1.5)), 1.5);
        assert_eq!(normalize_count(&json!([1])), 0.0);
        assert_eq!(normalize_count(&json!({"n": 1})), 0.0);
    }

    #[test]
    fn missing_fields_become_zero() {
        let s: StateRecord = serde_json::from_value(json!({"uf": "SP"})).unwrap();
        assert_eq!(s.state_code, "SP");
        assert_eq!(s.confirmed_cases, 0.0);
        assert_eq!(s.deaths, 0.0);
        assert_eq!(s.id, 0);
        assert_eq!(s.updated_at, "");
    }

    #[test]
    fn whole_counts_serialize_as_integers() {
        let c = CountryRecord {
            country_name: "Brazil".into(),
            confirmed_cases: 10.0,
            reported_cases: 2.5,
            deaths: 0.0,
            recovered: 1.0,
            updated_at: String::new(),
        };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["confirmed"], json!(10));
        assert_eq!(v["cases"], json!(2.5));
    }

    #[test]
    fn selection_parsing() {
        assert_eq!("_all".parse::<StateSelection>().unwrap(), StateSelection::AllStates);
        assert_eq!("ALL".parse::<StateSelection>().unwrap(), StateSelection::AllStates);
        assert_eq!(
            "sp".parse::<StateSelection>().unwrap(),
            StateSelection::Specific("SP".into())
        );
        assert!("  ".parse::<StateSelection>().is_err());
    }

    #[test]
    fn compact_date_strips_separators() {
        let d = NaiveDate::from_ymd_opt(2020, 3, 18).unwrap();
        assert_eq!(compact_date(d), "20200318");
    }
}
