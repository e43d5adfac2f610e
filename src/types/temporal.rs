//! Datetime values.
//!
//! The store returns datetimes as RFC3339 strings, e.g.
//! `2024-05-01T10:00:00.123456Z`. No other format is attempted.

use chrono::{DateTime, FixedOffset};

use super::FromValue;
use crate::error::{SurrealError, SurrealResult};
use crate::value::Value;

/// A datetime decoded from an RFC3339 string, keeping its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreTime(pub DateTime<FixedOffset>);

impl StoreTime {
    /// Parse an RFC3339 datetime.
    pub fn parse(s: &str) -> SurrealResult<Self> {
        DateTime::parse_from_rfc3339(s)
            .map(StoreTime)
            .map_err(|e| SurrealError::decode("RFC3339 datetime", format!("{:?}: {}", s, e)))
    }

    pub fn into_inner(self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl std::ops::Deref for StoreTime {
    type Target = DateTime<FixedOffset>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromValue for StoreTime {
    fn from_value(value: &Value) -> SurrealResult<Self> {
        match value {
            Value::String(s) => StoreTime::parse(s),
            other => Err(SurrealError::decode("RFC3339 datetime", other.kind())),
        }
    }
}

impl From<StoreTime> for Value {
    fn from(t: StoreTime) -> Self {
        Value::String(t.0.to_rfc3339())
    }
}

impl std::fmt::Display for StoreTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_utc() {
        let t = StoreTime::from_value(&Value::from("2023-11-05T14:30:00Z")).unwrap();
        assert_eq!(t.year(), 2023);
        assert_eq!(t.hour(), 14);
        assert_eq!(t.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_fraction_and_offset() {
        let t = StoreTime::from_value(&Value::from("2023-11-05T14:30:00.123456789-05:00"))
            .unwrap();
        assert_eq!(t.nanosecond(), 123_456_789);
        assert_eq!(t.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_rejects_other_formats() {
        for bad in ["2023-11-05", "05/11/2023 14:30", "1699194600", ""] {
            assert!(
                StoreTime::from_value(&Value::from(bad)).is_err(),
                "{bad} should not parse"
            );
        }
        assert!(StoreTime::from_value(&Value::Int(1_699_194_600)).is_err());
        assert!(StoreTime::from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_into_value() {
        let t = StoreTime::parse("2023-11-05T14:30:00+00:00").unwrap();
        assert_eq!(Value::from(t), Value::from("2023-11-05T14:30:00+00:00"));
    }
}
