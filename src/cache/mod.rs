//! Cache Module
//!
//! In-memory user and item cache with lazy, per-entry freshness checks.

mod entry;
mod freshness;
mod key;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::Cached;
pub use freshness::{FreshnessPolicy, DEFAULT_RELOAD_THRESHOLD_SECS};
pub use key::{ItemFilter, ItemKey};
pub use stats::CacheStats;
pub use store::{ItemLookup, LocalCache};
