//! Severity levels, numbered as in syslog(3)
//!
//! Lower values are more severe. A handle's threshold admits every record
//! whose severity is numerically less than or equal to it.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[repr(u8)]
pub enum Severity {
    /// System is unusable
    Emergency = 0,
    /// Action must be taken immediately
    Alert = 1,
    /// Critical conditions
    Critical = 2,
    /// Error conditions
    Error = 3,
    /// Warning conditions
    Warning = 4,
    /// Normal but significant condition
    Notice = 5,
    /// Informational
    #[default]
    Info = 6,
    /// Debug-level messages
    Debug = 7,
}

impl Severity {
    /// Every level, most severe first
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Emergency => "EMERG",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRIT",
            Severity::Error => "ERR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Numeric syslog value
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns true if a record at this severity passes `threshold`
    #[inline]
    pub fn passes(self, threshold: Severity) -> bool {
        self <= threshold
    }

    /// Convert a raw level, rejecting anything outside 0..=7
    pub fn from_raw(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Severity::Emergency),
            1 => Ok(Severity::Alert),
            2 => Ok(Severity::Critical),
            3 => Ok(Severity::Error),
            4 => Ok(Severity::Warning),
            5 => Ok(Severity::Notice),
            6 => Ok(Severity::Info),
            7 => Ok(Severity::Debug),
            _ => Err(LoggerError::invalid_severity(value)),
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = LoggerError;

    fn try_from(value: u8) -> Result<Self> {
        Severity::from_raw(i64::from(value))
    }
}

impl TryFrom<i32> for Severity {
    type Error = LoggerError;

    fn try_from(value: i32) -> Result<Self> {
        Severity::from_raw(i64::from(value))
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.value()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMERG" | "EMERGENCY" | "PANIC" => Ok(Severity::Emergency),
            "ALERT" => Ok(Severity::Alert),
            "CRIT" | "CRITICAL" => Ok(Severity::Critical),
            "ERR" | "ERROR" => Ok(Severity::Error),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "NOTICE" => Ok(Severity::Notice),
            "INFO" => Ok(Severity::Info),
            "DEBUG" => Ok(Severity::Debug),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_match_syslog() {
        for (expected, severity) in Severity::ALL.iter().enumerate() {
            assert_eq!(severity.value() as usize, expected);
        }
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_passes_threshold() {
        assert!(Severity::Error.passes(Severity::Warning));
        assert!(Severity::Warning.passes(Severity::Warning));
        assert!(!Severity::Debug.passes(Severity::Info));
        assert!(Severity::Emergency.passes(Severity::Emergency));
    }

    #[test]
    fn test_from_raw_rejects_out_of_range() {
        assert_eq!(Severity::from_raw(3).unwrap(), Severity::Error);
        assert!(matches!(
            Severity::from_raw(8),
            Err(LoggerError::InvalidSeverity { value: 8 })
        ));
        assert!(Severity::try_from(-1i32).is_err());
        assert!(Severity::try_from(200u8).is_err());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("Crit".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("err".parse::<Severity>().unwrap(), Severity::Error);
        assert!("verbose".parse::<Severity>().is_err());
    }
}
