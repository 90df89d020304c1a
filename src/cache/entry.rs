//! Cache Entry Module
//!
//! Defines the wrapper that pairs a cached value with its load time.

use chrono::{DateTime, Duration, Utc};

// == Cached ==
/// A cached value and the moment it was last fetched.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    /// The stored value
    pub value: T,
    /// When the value was last successfully fetched
    pub load_time: DateTime<Utc>,
}

impl<T> Cached<T> {
    // == Constructor ==
    /// Wraps a freshly fetched value stamped with the current time.
    pub fn new(value: T) -> Self {
        Self::loaded_at(value, Utc::now())
    }

    /// Wraps a value stamped with an explicit load time.
    pub fn loaded_at(value: T, load_time: DateTime<Utc>) -> Self {
        Self { value, load_time }
    }

    // == Is Fresh ==
    /// Checks whether the entry is still trusted at `now`.
    ///
    /// Boundary condition: fresh only while `now - load_time < threshold`.
    /// Once the full threshold has elapsed the entry is stale, and a zero
    /// threshold is never fresh.
    pub fn is_fresh(&self, threshold_secs: u64, now: DateTime<Utc>) -> bool {
        is_fresh(self.load_time, threshold_secs, now)
    }

    // == Age ==
    /// Returns how long ago the value was loaded, clamped at zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.load_time).max(Duration::zero())
    }
}

// Largest span chrono can represent in whole seconds
const MAX_THRESHOLD_SECS: i64 = i64::MAX / 1000;

/// Freshness rule shared by entries and index markers.
pub(crate) fn is_fresh(load_time: DateTime<Utc>, threshold_secs: u64, now: DateTime<Utc>) -> bool {
    if threshold_secs == 0 {
        return false;
    }
    let secs = i64::try_from(threshold_secs)
        .unwrap_or(i64::MAX)
        .min(MAX_THRESHOLD_SECS);
    let threshold = Duration::seconds(secs);
    now - load_time < threshold
}
