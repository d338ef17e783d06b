//! Number and date formatting for table cells, stat cards and chart labels.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use num_format::{Locale, ToFormattedString};

/// Locale used when the caller does not pick one.
pub const DEFAULT_LOCALE_TAG: &str = "pt";

/// Brasília time (UTC−3, no daylight saving since 2019).
const BRASILIA_OFFSET_SECS: i32 = -3 * 3600;

const NOT_AVAILABLE: &str = "N/A";

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `pt`, `pt_BR`, `en`, `en_US`, `de`, `fr`,
/// `es`, `it`, `nl`. Defaults to Brazilian Portuguese.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().replace('-', "_").as_str() {
        "en" | "us" | "en_us" => &Locale::en,
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::pt,
    }
}

/// Thousands-separated rendering of a count, e.g. `1234567` → `1.234.567` (pt).
/// Fractions keep up to three decimals.
pub fn format_count(v: f64, locale: &Locale) -> String {
    if !v.is_finite() {
        return "0".into();
    }
    let v = (v * 1000.0).round() / 1000.0;
    let whole = v.trunc();
    let mut out = (whole as i64).to_formatted_string(locale);
    if whole == 0.0 && v < 0.0 {
        out.insert(0, '-');
    }
    let millis = ((v - whole).abs() * 1000.0).round() as u32;
    if millis > 0 {
        let digits = format!("{millis:03}");
        out.push_str(locale.decimal());
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Shorter axis labels for charts: `1,2 mi`, `350 mil`.
pub fn format_compact(v: f64, locale: &Locale) -> String {
    let a = v.abs();
    let (scale, suffix) = if a >= 1.0e9 {
        (1.0e9, " bi")
    } else if a >= 1.0e6 {
        (1.0e6, " mi")
    } else if a >= 1.0e3 {
        (1.0e3, " mil")
    } else {
        (1.0, "")
    };
    let scaled = (v / scale * 10.0).round() / 10.0;
    format!("{}{}", format_count(scaled, locale), suffix)
}

/// `2020-05-20T22:45:31.000Z` → `20 de maio de 2020, 19:45` (Brasília time).
///
/// Empty input is `N/A`; anything that is not RFC 3339 is returned verbatim.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return NOT_AVAILABLE.into();
    }
    let Some(offset) = FixedOffset::east_opt(BRASILIA_OFFSET_SECS) else {
        return raw.to_string();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&offset)
            .format_localized("%d de %B de %Y, %H:%M", chrono::Locale::pt_BR)
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `2020-05-20` → `20 de maio de 2020`.
pub fn format_long_date(date: NaiveDate) -> String {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return date.to_string();
    };
    DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc)
        .format_localized("%d de %B de %Y", chrono::Locale::pt_BR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_get_separators() {
        assert_eq!(format_count(1_234_567.0, &Locale::en), "1,234,567");
        let sep = Locale::pt.separator();
        assert_eq!(format_count(1_234.0, &Locale::pt), format!("1{sep}234"));
        assert_eq!(format_count(0.0, &Locale::en), "0");
        assert_eq!(format_count(-3.0, &Locale::en), "-3");
        assert_eq!(format_count(1.5, &Locale::en), "1.5");
        assert_eq!(format_count(-0.25, &Locale::en), "-0.25");
    }

    #[test]
    fn compact_axis_labels() {
        assert_eq!(format_compact(1_200_000.0, &Locale::en), "1.2 mi");
        assert_eq!(format_compact(350_000.0, &Locale::en), "350 mil");
        assert_eq!(format_compact(12.0, &Locale::en), "12");
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(""), "N/A");
        assert_eq!(format_timestamp("ontem"), "ontem");
        let s = format_timestamp("2020-05-20T22:45:31.000Z");
        assert!(s.starts_with("20 de "), "{s}");
        assert!(s.ends_with("de 2020, 19:45"), "{s}");
    }

    #[test]
    fn locale_tags() {
        assert_eq!(map_locale("EN-us").separator(), Locale::en.separator());
        assert_eq!(map_locale("xx").separator(), Locale::pt.separator());
    }
}
