use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Instant supplied by the execution environment with each operation.
///
/// Second granularity, counted from the UNIX epoch. Several operations can
/// carry the same timestamp; the payment processor relies on that to merge
/// them. Ordering is plain numeric ordering.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The UNIX epoch.
    pub const EPOCH: Self = Self(0);

    pub const fn from_unix(seconds: i64) -> Self {
        Self(seconds)
    }

    /// The current wall-clock time, truncated to whole seconds.
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub const fn as_unix(self) -> i64 {
        self.0
    }

    /// Returns `true` if this timestamp is strictly before `other`.
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }

    /// RFC 3339 rendering, or `None` when outside chrono's range.
    pub fn to_rfc3339(self) -> Option<String> {
        DateTime::<Utc>::from_timestamp(self.0, 0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    /// Accepts either integer UNIX seconds or an RFC 3339 date-time.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(seconds) = s.parse::<i64>() {
            return Ok(Self(seconds));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.timestamp()))
            .map_err(|e| TypeError::InvalidTimestamp(format!("{s:?}: {e}")))
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Some(rendered) => f.write_str(&rendered),
            None => write!(f, "{}s", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_numeric() {
        assert!(Timestamp::from_unix(0) < Timestamp::from_unix(100));
        assert!(Timestamp::from_unix(-1).is_before(&Timestamp::EPOCH));
    }

    #[test]
    fn now_produces_reasonable_timestamp() {
        // Should be after 2020-01-01.
        assert!(Timestamp::now().as_unix() > 1_577_836_800);
    }

    #[test]
    fn display_format() {
        assert_eq!(Timestamp::EPOCH.to_string(), "1970-01-01T00:00:00Z");
        assert_eq!(Timestamp::from_unix(100).to_string(), "1970-01-01T00:01:40Z");
    }

    #[test]
    fn parse_unix_and_rfc3339() {
        assert_eq!("100".parse::<Timestamp>().unwrap(), Timestamp::from_unix(100));
        assert_eq!(
            "1970-01-01T00:01:40Z".parse::<Timestamp>().unwrap(),
            Timestamp::from_unix(100)
        );
        assert!("yesterday".parse::<Timestamp>().is_err());
    }

    #[test]
    fn serde_is_plain_integer() {
        let json = serde_json::to_string(&Timestamp::from_unix(42)).unwrap();
        assert_eq!(json, "42");
    }
}
