//! Timestamp prefixes for file sinks

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// How a file sink stamps each line
///
/// # Examples
///
/// ```
/// use slot_logger::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Clock.format(&at), "10:30:45.000000");
/// assert_eq!(TimestampFormat::None.format(&at), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Wall-clock time with microseconds: `10:30:45.123456`
    #[default]
    Clock,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456`
    Iso8601Micros,

    /// RFC 3339 with offset: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// No prefix at all
    None,

    /// Any strftime-compatible format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format<Tz: TimeZone>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        match self {
            TimestampFormat::Clock => datetime.format("%H:%M:%S%.6f").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            TimestampFormat::Rfc3339 => datetime.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::None => String::new(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Format the current local time
    #[must_use]
    pub fn now(&self) -> String {
        self.format(&Local::now())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TimestampFormat::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(TimestampFormat::Clock.format(&fixed_datetime()), "10:30:45.123456");
    }

    #[test]
    fn test_iso8601_micros_format() {
        assert_eq!(
            TimestampFormat::Iso8601Micros.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123456"
        );
    }

    #[test]
    fn test_rfc3339_format() {
        assert_eq!(
            TimestampFormat::Rfc3339.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123456+00:00"
        );
    }

    #[test]
    fn test_unix_micros_format() {
        assert_eq!(
            TimestampFormat::UnixMicros.format(&fixed_datetime()),
            "1736332245123456"
        );
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_default_is_clock() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::Clock);
        assert!(TimestampFormat::None.is_none());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TimestampFormat::Clock).expect("serialize");
        assert_eq!(json, "\"Clock\"");

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
