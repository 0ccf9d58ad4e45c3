//! Calendar-date input and output for the command line.
//!
//! Dates are entered as `YYYY-MM-DD` and stored as UTC midnight in epoch
//! milliseconds.

use chrono::{DateTime, NaiveDate, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses `YYYY-MM-DD` into UTC-midnight epoch milliseconds.
pub fn parse_date(raw: &str) -> Result<i64, String> {
    let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|err| format!("invalid date `{raw}` ({err}); expected YYYY-MM-DD"))?;
    midnight_millis(date)
}

/// Current UTC day at midnight, epoch milliseconds.
pub fn today() -> Result<i64, String> {
    midnight_millis(Utc::now().date_naive())
}

pub fn format_date(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|moment| moment.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn format_optional(millis: Option<i64>) -> String {
    millis.map_or_else(|| "-".to_string(), format_date)
}

fn midnight_millis(date: NaiveDate) -> Result<i64, String> {
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc().timestamp_millis())
        .ok_or_else(|| format!("date `{date}` has no midnight"))
}

#[cfg(test)]
mod tests {
    use super::{format_date, format_optional, parse_date};

    #[test]
    fn parses_to_utc_midnight() {
        assert_eq!(parse_date("2024-01-01").unwrap(), 1_704_067_200_000);
        assert_eq!(parse_date(" 1970-01-02 ").unwrap(), 86_400_000);
    }

    #[test]
    fn rejects_other_formats() {
        assert!(parse_date("01/02/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn formats_dates_and_missing_values() {
        assert_eq!(format_date(1_704_067_200_000), "2024-01-01");
        assert_eq!(format_optional(None), "-");
    }
}
