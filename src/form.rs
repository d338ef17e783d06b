//! Manual data-entry form: raw field text in, validated [`SubmittedForm`] out.

use crate::error::{FieldError, FormError};
use crate::models::SubmittedForm;
use chrono::NaiveDate;

const STATE_REQUIRED: &str = "Estado é obrigatório";
const NOT_A_NUMBER: &str = "Deve ser um número";
const NEGATIVE: &str = "Deve ser maior ou igual a 0";
const DATE_REQUIRED: &str = "Data é obrigatória";
const DATE_INVALID: &str = "Data inválida";

/// Field values exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub state: String,
    pub cases: String,
    pub confirmed: String,
    pub deaths: String,
    pub recovered: String,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub date: String,
}

impl FormInput {
    /// Check every field and collect all failures, not just the first.
    pub fn validate(&self) -> Result<SubmittedForm, FormError> {
        let mut errors = Vec::new();
        let mut fail = |field: &'static str, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            })
        };

        let state = self.state.trim();
        if state.chars().count() < 2 {
            fail("state", STATE_REQUIRED);
        }

        let mut count = |field: &'static str, raw: &str| match coerce_number(raw) {
            Some(v) if v < 0.0 => {
                fail(field, NEGATIVE);
                0.0
            }
            Some(v) => v,
            None => {
                fail(field, NOT_A_NUMBER);
                0.0
            }
        };
        let cases = count("cases", &self.cases);
        let confirmed = count("confirmed", &self.confirmed);
        let deaths = count("deaths", &self.deaths);
        let recovered = count("recovered", &self.recovered);

        let date = match parse_date(&self.date) {
            Ok(d) => Some(d),
            Err(message) => {
                fail("date", message);
                None
            }
        };

        match date {
            Some(date) if errors.is_empty() => Ok(SubmittedForm {
                state_name: state.to_string(),
                cases,
                confirmed,
                deaths,
                recovered,
                date,
            }),
            _ => Err(FormError { errors }),
        }
    }
}

/// Empty input counts as zero, like an untouched number field.
fn coerce_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_date(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DATE_REQUIRED);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| DATE_INVALID)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> FormInput {
        FormInput {
            state: "São Paulo".into(),
            cases: "10".into(),
            confirmed: "8".into(),
            deaths: "1".into(),
            recovered: "5".into(),
            date: "2020-05-20".into(),
        }
    }

    #[test]
    fn valid_form() {
        let f = input().validate().unwrap();
        assert_eq!(f.state_name, "São Paulo");
        assert_eq!(f.cases, 10.0);
        assert_eq!(f.date, NaiveDate::from_ymd_opt(2020, 5, 20).unwrap());
    }

    #[test]
    fn brazilian_date_and_blank_counts() {
        let mut i = input();
        i.date = "20/05/2020".into();
        i.recovered = "".into();
        let f = i.validate().unwrap();
        assert_eq!(f.date, NaiveDate::from_ymd_opt(2020, 5, 20).unwrap());
        assert_eq!(f.recovered, 0.0);
    }

    #[test]
    fn every_bad_field_is_reported() {
        let i = FormInput {
            state: "S".into(),
            cases: "-1".into(),
            confirmed: "abc".into(),
            deaths: "0".into(),
            recovered: "0".into(),
            date: "".into(),
        };
        let err = i.validate().unwrap_err();
        assert_eq!(err.errors.len(), 4);
        assert_eq!(err.message_for("state"), Some(STATE_REQUIRED));
        assert_eq!(err.message_for("cases"), Some(NEGATIVE));
        assert_eq!(err.message_for("confirmed"), Some(NOT_A_NUMBER));
        assert_eq!(err.message_for("date"), Some(DATE_REQUIRED));
        assert_eq!(err.message_for("deaths"), None);
    }

    #[test]
    fn invalid_date() {
        let mut i = input();
        i.date = "2020-13-45".into();
        assert_eq!(i.validate().unwrap_err().message_for("date"), Some(DATE_INVALID));
    }
}
