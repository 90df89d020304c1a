//! Freshness Policy Module
//!
//! Per-entity-kind reload thresholds with per-call overrides.

/// Default reload threshold in seconds for both users and items.
pub const DEFAULT_RELOAD_THRESHOLD_SECS: u64 = 300;

/// How long cached users and items are trusted without refetching.
///
/// Evaluated lazily at read time; nothing expires in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    user_threshold_secs: u64,
    item_threshold_secs: u64,
}

impl FreshnessPolicy {
    pub fn new(user_threshold_secs: u64, item_threshold_secs: u64) -> Self {
        Self {
            user_threshold_secs,
            item_threshold_secs,
        }
    }

    /// Effective user threshold: the override when given, else the default.
    pub fn user_threshold(&self, override_secs: Option<u64>) -> u64 {
        override_secs.unwrap_or(self.user_threshold_secs)
    }

    /// Effective item threshold: the override when given, else the default.
    pub fn item_threshold(&self, override_secs: Option<u64>) -> u64 {
        override_secs.unwrap_or(self.item_threshold_secs)
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RELOAD_THRESHOLD_SECS, DEFAULT_RELOAD_THRESHOLD_SECS)
    }
}
