//! Issue date extraction from the `Fecha` timestamp.

use chrono::{Datelike, NaiveDate};

use super::patterns::ISO_DATE;
use super::{ExtractionMatch, FieldExtractor};

/// Format used for date folders.
pub const DATE_FOLDER_FORMAT: &str = "%Y-%m-%d";

/// Extracts the calendar date from a CFDI timestamp such as
/// `2024-03-15T10:30:00`. Time of day is discarded.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        // Everything before the first 'T', or the whole value if there is none.
        let candidate = text.split('T').next().unwrap_or(text);

        if !ISO_DATE.is_match(candidate) {
            return None;
        }

        let date = NaiveDate::parse_from_str(candidate, DATE_FOLDER_FORMAT).ok()?;

        // Calendar years start at 1.
        if date.year() < 1 {
            return None;
        }

        Some(ExtractionMatch::new(date, candidate))
    }
}

/// Folder name for a raw `Fecha` value, or `None` if it is missing or invalid.
pub fn date_folder(fecha: Option<&str>) -> Option<String> {
    let found = DateExtractor::new().extract(fecha?)?;
    Some(found.value.format(DATE_FOLDER_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_timestamp_date() {
        let result = DateExtractor::new().extract("2024-03-15T10:30:00");
        assert!(result.is_some());

        let result = result.unwrap();
        assert_eq!(result.value, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(result.source, "2024-03-15");
    }

    #[test]
    fn test_date_without_time() {
        assert_eq!(date_folder(Some("2024-05-01")), Some("2024-05-01".to_string()));
    }

    #[test]
    fn test_invalid_dates_rejected() {
        assert_eq!(date_folder(Some("2024-13-01T00:00:00")), None);
        assert_eq!(date_folder(Some("2023-02-29T00:00:00")), None);
        assert_eq!(date_folder(Some("2024-5-1T00:00:00")), None);
        assert_eq!(date_folder(Some("15/03/2024")), None);
        assert_eq!(date_folder(Some("T10:30:00")), None);
        assert_eq!(date_folder(Some("0000-01-01T00:00:00")), None);
        assert_eq!(date_folder(Some("")), None);
        assert_eq!(date_folder(None), None);
    }

    #[test]
    fn test_first_calendar_year_accepted() {
        assert_eq!(date_folder(Some("0001-01-01")), Some("0001-01-01".to_string()));
    }

    #[test]
    fn test_leap_day_accepted() {
        assert_eq!(
            date_folder(Some("2024-02-29T23:59:59")),
            Some("2024-02-29".to_string())
        );
    }
}
