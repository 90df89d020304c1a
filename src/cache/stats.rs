//! Cache Statistics Module
//!
//! Tracks how often cached users and items were trusted versus refetched.

use serde::Serialize;

// == Cache Stats ==
/// Counters for cache lookups.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// User lookups answered from the cache
    pub user_hits: u64,
    /// User lookups that required a refetch (absent or stale)
    pub user_misses: u64,
    /// Item IDs returned as valid cached entries
    pub item_hits: u64,
    /// Item IDs handed back for refresh
    pub item_misses: u64,
    /// Current number of cached users
    pub total_users: usize,
    /// Current number of cached items
    pub total_items: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the combined hit rate across users and items.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.user_hits + self.item_hits;
        let total = hits + self.user_misses + self.item_misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn record_user_hit(&mut self) {
        self.user_hits += 1;
    }

    pub fn record_user_miss(&mut self) {
        self.user_misses += 1;
    }

    /// Adds the outcome of one item lookup.
    pub fn record_item_lookup(&mut self, hits: usize, misses: usize) {
        self.item_hits += hits as u64;
        self.item_misses += misses as u64;
    }
}
