//! Date range selection and validation.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Wire format for range boundaries in query strings.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive date range with `start <= end`.
///
/// The only way to build one is through [`DateRange::new`], so holding a
/// `DateRange` means the range has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Validates and builds a range.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRange`] when `start > end`. Equal dates
    /// are a valid single-day range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        validate_range(start, end)?;
        Ok(Self { start, end })
    }

    /// The range the dashboard opens with: one month back through `today`.
    pub fn default_window(today: NaiveDate) -> Self {
        let start = today.checked_sub_months(Months::new(1)).unwrap_or(today);
        Self { start, end: today }
    }

    /// Start date.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// End date.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Query parameters for the filtered-costs endpoint.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start.format(QUERY_DATE_FORMAT).to_string()),
            ("end_date", self.end.format(QUERY_DATE_FORMAT).to_string()),
        ]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(QUERY_DATE_FORMAT),
            self.end.format(QUERY_DATE_FORMAT)
        )
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: NaiveDate,
            end: NaiveDate,
        }

        let raw = Raw::deserialize(deserializer)?;
        DateRange::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

/// Rejects a range whose start is after its end.
///
/// # Errors
///
/// Returns [`CoreError::InvalidRange`] when `start > end`.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), CoreError> {
    if start > end {
        return Err(CoreError::InvalidRange { start, end });
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`CoreError::InvalidData`] if the text is not a calendar date.
pub fn parse_query_date(text: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(text.trim(), QUERY_DATE_FORMAT)
        .map_err(|e| CoreError::InvalidData(format!("bad date {text:?}: {e}")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_after_end_rejected() {
        let result = DateRange::new(date(2024, 3, 1), date(2024, 2, 1));
        assert!(matches!(result, Err(CoreError::InvalidRange { .. })));
    }

    #[test]
    fn test_equal_dates_accepted() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn test_ordered_dates_accepted() {
        let range = DateRange::new(date(2024, 2, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(range.days(), 30);
    }

    #[test]
    fn test_query_params_format() {
        let range = DateRange::new(date(2024, 1, 5), date(2024, 2, 9)).unwrap();
        let params = range.query_params();
        assert_eq!(params[0], ("start_date", "2024-01-05".to_string()));
        assert_eq!(params[1], ("end_date", "2024-02-09".to_string()));
    }

    #[test]
    fn test_default_window_is_one_month() {
        let range = DateRange::default_window(date(2024, 3, 31));
        assert_eq!(range.start(), date(2024, 2, 29));
        assert_eq!(range.end(), date(2024, 3, 31));
    }

    #[test]
    fn test_deserialize_rejects_inverted_range() {
        let json = r#"{"start":"2024-03-01","end":"2024-02-01"}"#;
        assert!(serde_json::from_str::<DateRange>(json).is_err());
    }

    #[test]
    fn test_parse_query_date() {
        assert_eq!(parse_query_date("2024-02-01").unwrap(), date(2024, 2, 1));
        assert!(parse_query_date("02/01/2024").is_err());
    }
}
