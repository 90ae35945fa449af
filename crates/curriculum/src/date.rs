use crate::{CurriculumError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Turns an API timestamp into the text shown in an annotation.
pub trait DateFormatter {
    /// Returns `None` when the timestamp cannot be interpreted; callers
    /// treat that the same as a missing date.
    fn format_date(&self, iso: &str) -> Option<String>;
}

/// `"{month}/{year}"` in UTC, month 1-based without padding (`2/2023`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthYearFormatter;

impl DateFormatter for MonthYearFormatter {
    fn format_date(&self, iso: &str) -> Option<String> {
        match parse_created(iso) {
            Ok(ts) => Some(format!("{}/{}", ts.month(), ts.year())),
            Err(err) => {
                log::warn!("Skipping unparseable date: {err}");
                None
            }
        }
    }
}

/// Parses the timestamp formats seen in curriculum payloads.
///
/// RFC 3339 with an offset is the normal shape; a bare date-time or a bare
/// date is read as UTC.
pub fn parse_created(iso: &str) -> Result<DateTime<Utc>> {
    let raw = iso.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = day.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(CurriculumError::InvalidDate(raw.to_string()))
}

pub fn created_year(iso: &str) -> Option<i32> {
    parse_created(iso).ok().map(|ts| ts.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_month_and_year_without_padding() {
        let f = MonthYearFormatter;
        assert_eq!(f.format_date("2023-01-01T00:00:00Z").as_deref(), Some("1/2023"));
        assert_eq!(f.format_date("2019-11-30T08:15:00Z").as_deref(), Some("11/2019"));
    }

    #[test]
    fn converts_offsets_to_utc() {
        let f = MonthYearFormatter;
        assert_eq!(
            f.format_date("2023-03-01T01:00:00+02:00").as_deref(),
            Some("2/2023")
        );
    }

    #[test]
    fn accepts_naive_shapes() {
        assert_eq!(created_year("2021-06-15T10:00:00"), Some(2021));
        assert_eq!(created_year("2020-12-31"), Some(2020));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse_created("last tuesday"),
            Err(CurriculumError::InvalidDate(_))
        ));
        assert_eq!(MonthYearFormatter.format_date("").as_deref(), None);
    }
}
