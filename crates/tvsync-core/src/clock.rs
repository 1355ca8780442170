//! Run timestamps.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid time format {0:?}")]
pub struct TimestampError(pub String);

/// Formats `at` with a strftime pattern, rejecting patterns chrono cannot render.
pub fn format_at<Tz>(at: &DateTime<Tz>, format: &str) -> Result<String, TimestampError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(TimestampError(format.to_string()));
    }
    Ok(at.format_with_items(StrftimeItems::new(format)).to_string())
}

/// Current local time formatted with `format`.
pub fn now(format: &str) -> Result<String, TimestampError> {
    format_at(&Local::now(), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn formats_default_pattern() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_at(&at, "%Y-%m-%d %H:%M:%S").unwrap(), "2024-03-09 07:05:01");
    }

    #[test]
    fn rejects_bad_pattern() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert!(format_at(&at, "%Q").is_err());
    }

    #[test]
    fn now_uses_format() {
        let s = now("%Y").unwrap();
        assert_eq!(s.len(), 4);
    }
}
