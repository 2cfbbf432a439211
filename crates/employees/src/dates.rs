//! Lenient calendar-date parsing.
//!
//! Clients send either plain dates (`2000-01-01`) or date-times
//! (`2000-01-01T00:00:00`, optionally with fraction and offset). Only the
//! calendar date is kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use personnel_core::{DomainError, DomainResult};

/// Parse a calendar date from a plain date or a date-time string.
pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    Err(DomainError::invalid_date(raw))
}

/// Serde adapter for `Option<NaiveDate>` fields that go through [`parse_date`].
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_date(&raw).map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_plain_dates_and_date_times() {
        assert_eq!(parse_date("2000-01-01").unwrap(), ymd(2000, 1, 1));
        assert_eq!(parse_date("2000-01-01T00:00:00").unwrap(), ymd(2000, 1, 1));
        assert_eq!(parse_date("2000-01-01T13:45:10.123").unwrap(), ymd(2000, 1, 1));
        assert_eq!(parse_date("2000-01-01T23:00:00+02:00").unwrap(), ymd(2000, 1, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_date("yesterday"), Err(DomainError::InvalidDate { .. })));
        assert!(parse_date("2000-13-01").is_err());
    }
}
