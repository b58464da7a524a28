//! Domain primitives: TimeNs, LeaseId.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nanoseconds in a 365-day year.
pub const NANOS_PER_YEAR: u64 = 365 * 24 * 60 * 60 * 1_000_000_000;

/// Time in nanoseconds since Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeNs(pub u64);

impl TimeNs {
    /// Create a TimeNs from nanoseconds.
    pub fn new(nanos: u64) -> Self {
        TimeNs(nanos)
    }

    /// Get the underlying nanoseconds value.
    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Convert a UTC datetime. Returns None for instants before the epoch or
    /// outside the range chrono can express in nanoseconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Option<Self> {
        let nanos = dt.timestamp_nanos_opt()?;
        u64::try_from(nanos).ok().map(TimeNs)
    }

    /// Nanoseconds elapsed since `earlier`, or None if `earlier` is later.
    pub fn checked_since(&self, earlier: TimeNs) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }

    /// Step back by `nanos`, stopping at the epoch.
    pub fn saturating_sub_nanos(&self, nanos: u64) -> Self {
        TimeNs(self.0.saturating_sub(nanos))
    }
}

impl std::fmt::Display for TimeNs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Identifier of a lease (position) on the remote system, usually a contract address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaseId(pub String);

impl LeaseId {
    /// Create a LeaseId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        LeaseId(id.into())
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LeaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
