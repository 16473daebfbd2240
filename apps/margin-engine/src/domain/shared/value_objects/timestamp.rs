//! Timestamp value object for on-chain style time.
//!
//! Time is always an explicit input: operations receive `now` instead of
//! reading a clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create from Unix seconds.
    #[must_use]
    pub const fn from_unix(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Current wall-clock time (binary entry points only).
    #[must_use]
    pub fn now() -> Self {
        Self(u64::try_from(Utc::now().timestamp()).unwrap_or(0))
    }

    /// Parse from an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a valid RFC 3339 timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(u64::try_from(dt.timestamp()).unwrap_or(0)))
    }

    /// Unix seconds.
    #[must_use]
    pub const fn unix_seconds(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward, saturating at the maximum.
    #[must_use]
    pub const fn plus_seconds(self, seconds: u64) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Seconds from `self` until `later`, or `None` if `later` is earlier.
    #[must_use]
    pub const fn seconds_until(self, later: Self) -> Option<u64> {
        later.0.checked_sub(self.0)
    }

    /// Format as RFC 3339, if representable.
    #[must_use]
    pub fn to_rfc3339(&self) -> Option<String> {
        let secs = i64::try_from(self.0).ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Some(s) => f.write_str(&s),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<u64> for Timestamp {
    fn from(seconds: u64) -> Self {
        Self(seconds)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
