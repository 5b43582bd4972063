//! Lenient value and date coercion shared by both sources.

use chrono::NaiveDate;
use serde_json::Value;

use crate::data::outcome::FetchError;

/// Coerce a raw text cell into a value. Anything that is not a finite number
/// is missing, never an error.
pub fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Coerce a JSON cell (number or numeric string) into a value.
pub fn value_from_json(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_value(s),
        _ => None,
    }
}

/// Parse an observation date.
///
/// ISO dates (optionally with a time suffix) are the norm. Slash-separated
/// dates without a leading year are read month-first, so `05/03/2024` is
/// 3 May 2024.
pub fn parse_date(raw: &str) -> Result<NaiveDate, FetchError> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    let s = raw.trim();
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // "2024-05-31 00:00:00" / "2024-05-31T00:00:00Z"
    if let Some(prefix) = s.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Ok(d);
        }
    }
    Err(FetchError::Schema(format!("invalid observation date '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_coerce_to_missing() {
        assert_eq!(parse_value(" 2.875 "), Some(2.875));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(value_from_json(&serde_json::json!(41.5)), Some(41.5));
        assert_eq!(value_from_json(&serde_json::json!("41.5")), Some(41.5));
        assert_eq!(value_from_json(&serde_json::json!(null)), None);
    }

    #[test]
    fn dates_accept_known_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert_eq!(parse_date("2024-05-31").unwrap(), expected);
        assert_eq!(parse_date("2024/05/31").unwrap(), expected);
        assert_eq!(parse_date("05/31/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-05-31 00:00:00").unwrap(), expected);
        assert!(matches!(parse_date("May 31"), Err(FetchError::Schema(_))));
    }

    #[test]
    fn ambiguous_slash_dates_are_month_first() {
        assert_eq!(parse_date("05/03/2024").unwrap(), NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        // Day-first only dates are not guessed at.
        assert!(matches!(parse_date("31/05/2024"), Err(FetchError::Schema(_))));
        assert!(matches!(parse_date("31-05-2024"), Err(FetchError::Schema(_))));
    }
}
