//! Cache Store Module
//!
//! In-memory record of what was last fetched and when, for users and items.
//! Items are stored once per ID; owner and filter queries reach them through
//! index tables mapping the query to the IDs it last produced.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::entry::is_fresh;
use crate::cache::{CacheStats, Cached, FreshnessPolicy, ItemKey};
use crate::models::{ItemInfo, UserData};

// == Index Entry ==
/// The ordered item IDs a query last resolved to.
///
/// The load time only matters for empty results: a fresh empty entry marks
/// the query as answered with zero items.
#[derive(Debug, Clone)]
struct IndexEntry {
    ids: Vec<String>,
    load_time: DateTime<Utc>,
}

// == Item Lookup ==
/// Partition of a query's candidate IDs into trusted entries and IDs to refetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemLookup {
    /// Cached items still within the freshness window, in candidate order
    pub valid_items: Vec<ItemInfo>,
    /// Candidate IDs that are absent or stale, in candidate order
    pub refresh_ids: Vec<String>,
    /// No usable cached resolution: the full original query must be sent
    pub cold: bool,
    /// Every candidate ID in index or request order
    pub candidates: Vec<String>,
}

impl ItemLookup {
    /// Whether the remote API must be consulted at all.
    pub fn needs_fetch(&self) -> bool {
        self.cold || !self.refresh_ids.is_empty()
    }
}

// == Local Cache ==
/// Process-wide item and user cache.
///
/// Constructed once at startup and passed to callers. Nothing is evicted;
/// entries live until they are invalidated or the process exits.
#[derive(Debug, Default)]
pub struct LocalCache {
    users: HashMap<String, Cached<UserData>>,
    items: HashMap<String, Cached<ItemInfo>>,
    /// Owner user ID -> item IDs
    owner_index: HashMap<String, IndexEntry>,
    /// Canonical filter -> item IDs
    filter_index: HashMap<String, IndexEntry>,
    policy: FreshnessPolicy,
    stats: CacheStats,
}

impl LocalCache {
    // == Constructor ==
    /// Creates an empty cache with the given freshness policy.
    pub fn new(policy: FreshnessPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    // == Users ==
    /// Returns the cached user if it was loaded less than `threshold` seconds ago.
    ///
    /// `None` means the caller must refetch; it is never an error.
    pub fn get_user(&mut self, user_id: &str, threshold: Option<u64>) -> Option<UserData> {
        self.get_user_at(user_id, threshold, Utc::now())
    }

    pub(crate) fn get_user_at(
        &mut self,
        user_id: &str,
        threshold: Option<u64>,
        now: DateTime<Utc>,
    ) -> Option<UserData> {
        let threshold = self.policy.user_threshold(threshold);
        match self.users.get(user_id) {
            Some(entry) if entry.is_fresh(threshold, now) => {
                self.stats.record_user_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_user_miss();
                debug!(user_id, "user cache miss");
                None
            }
        }
    }

    /// Overwrites the user entry wholesale and resets its load time.
    pub fn save_user(&mut self, user_id: impl Into<String>, user: UserData) {
        self.save_user_at(user_id, user, Utc::now());
    }

    pub(crate) fn save_user_at(
        &mut self,
        user_id: impl Into<String>,
        user: UserData,
        now: DateTime<Utc>,
    ) {
        self.users.insert(user_id.into(), Cached::loaded_at(user, now));
    }

    /// Drops the user entry so the next read misses. Absent IDs are a no-op.
    pub fn force_reload_user(&mut self, user_id: &str) {
        self.users.remove(user_id);
    }

    // == Items ==
    /// Resolves `key` to candidate IDs and partitions them by freshness.
    ///
    /// `valid_items` and `refresh_ids` together hold every candidate exactly once.
    pub fn get_items(&mut self, key: &ItemKey, threshold: Option<u64>) -> ItemLookup {
        self.get_items_at(key, threshold, Utc::now())
    }

    pub(crate) fn get_items_at(
        &mut self,
        key: &ItemKey,
        threshold: Option<u64>,
        now: DateTime<Utc>,
    ) -> ItemLookup {
        let threshold = self.policy.item_threshold(threshold);

        let (candidates, index) = match key {
            ItemKey::ById(ids) => (ids.as_slice(), None),
            ItemKey::ByOwner(user_id) => {
                let entry = self.owner_index.get(user_id);
                (entry.map_or(&[][..], |e| e.ids.as_slice()), Some(entry))
            }
            ItemKey::ByFilter(filter) => {
                let entry = self.filter_index.get(&filter.canonical());
                (entry.map_or(&[][..], |e| e.ids.as_slice()), Some(entry))
            }
        };

        let mut lookup = ItemLookup {
            candidates: candidates.to_vec(),
            ..ItemLookup::default()
        };
        for id in candidates {
            match self.items.get(id) {
                Some(entry) if entry.is_fresh(threshold, now) => {
                    lookup.valid_items.push(entry.value.clone())
                }
                _ => lookup.refresh_ids.push(id.clone()),
            }
        }

        lookup.cold = match index {
            // Explicit IDs: nothing valid means fetch the whole list
            None => lookup.valid_items.is_empty() && !candidates.is_empty(),
            // Never queried
            Some(None) => true,
            // Answered with zero items; trusted while the marker is fresh
            Some(Some(entry)) if entry.ids.is_empty() => {
                !is_fresh(entry.load_time, threshold, now)
            }
            Some(Some(_)) => lookup.valid_items.is_empty(),
        };

        self.stats
            .record_item_lookup(lookup.valid_items.len(), lookup.refresh_ids.len());
        debug!(
            key = %key.flight_key(),
            valid = lookup.valid_items.len(),
            refresh = lookup.refresh_ids.len(),
            cold = lookup.cold,
            "item cache lookup"
        );

        lookup
    }

    /// Stores freshly fetched items and, for owner/filter keys, replaces the
    /// index entry with their IDs in the given order.
    pub fn save_items(&mut self, key: &ItemKey, items: Vec<ItemInfo>) {
        self.save_items_at(key, items, Utc::now());
    }

    pub(crate) fn save_items_at(&mut self, key: &ItemKey, items: Vec<ItemInfo>, now: DateTime<Utc>) {
        let ids: Vec<String> = items.iter().map(|info| info.id().to_string()).collect();
        self.save_index_at(key, ids, now);

        for mut info in items {
            info.load_time = Some(now);
            self.items
                .insert(info.id().to_string(), Cached::loaded_at(info, now));
        }
    }

    /// Replaces the index entry for an owner or filter key without touching
    /// any item entry. Explicit ID keys have no index and are ignored.
    pub fn save_index(&mut self, key: &ItemKey, ids: Vec<String>) {
        self.save_index_at(key, ids, Utc::now());
    }

    fn save_index_at(&mut self, key: &ItemKey, ids: Vec<String>, now: DateTime<Utc>) {
        let entry = IndexEntry { ids, load_time: now };
        match key {
            ItemKey::ById(_) => {}
            ItemKey::ByOwner(user_id) => {
                self.owner_index.insert(user_id.clone(), entry);
            }
            ItemKey::ByFilter(filter) => {
                self.filter_index.insert(filter.canonical(), entry);
            }
        }
    }

    /// Drops a single item entry. Index entries that list it are left alone
    /// and will report the ID for refresh.
    pub fn force_reload_item(&mut self, item_id: &str) {
        self.items.remove(item_id);
    }

    /// Applies `patch` to the cached item so every query referencing the ID
    /// observes the same value. The load time is unchanged.
    ///
    /// Returns the patched item, or `None` when the item is not cached.
    pub fn update_item_entry<F>(&mut self, item_id: &str, patch: F) -> Option<ItemInfo>
    where
        F: FnOnce(&mut ItemInfo),
    {
        let entry = self.items.get_mut(item_id)?;
        patch(&mut entry.value);
        Some(entry.value.clone())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_users = self.users.len();
        stats.total_items = self.items.len();
        stats
    }

    /// Returns the number of cached item entries.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the number of cached user entries.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
