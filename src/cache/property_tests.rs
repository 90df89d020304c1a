//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the store's partition and freshness guarantees.

use proptest::prelude::*;
use std::collections::HashSet;

use chrono::{Duration, Utc};

use crate::cache::{ItemFilter, ItemKey, LocalCache};
use crate::models::item::fixtures::item_info;
use crate::models::user::fixtures::user;
use crate::models::ItemInfo;

// == Test Configuration ==
const TEST_THRESHOLD: u64 = 300;

// == Strategies ==
/// Generates item or user IDs
fn id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,24}".prop_map(|s| s)
}

/// Generates a list of distinct IDs, order preserved
fn unique_ids_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(id_strategy(), 0..max).prop_map(|ids| {
        let mut seen = HashSet::new();
        ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
    })
}

/// How an ID is seeded before the lookup under test
#[derive(Debug, Clone, Copy)]
enum Seed {
    Absent,
    Fresh,
    Stale,
}

fn seed_strategy() -> impl Strategy<Value = Seed> {
    prop_oneof![Just(Seed::Absent), Just(Seed::Fresh), Just(Seed::Stale)]
}

/// Generates a filter from arbitrary string criteria
fn filter_entries_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9]{0,8}", 1..6)
        .prop_map(|map| map.into_iter().collect())
}

fn infos(ids: &[String]) -> Vec<ItemInfo> {
    ids.iter().map(|id| item_info(id, "owner", 10.0)).collect()
}

fn ids_of(items: &[ItemInfo]) -> Vec<String> {
    items.iter().map(|i| i.id().to_string()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* user ID, saving a user and reading it back within the
    // freshness window returns exactly the saved record.
    #[test]
    fn prop_user_roundtrip(user_id in id_strategy(), name in "[a-zA-Z ]{1,32}") {
        let mut cache = LocalCache::default();
        let data = user(&user_id, &name);

        cache.save_user(user_id.clone(), data.clone());

        prop_assert_eq!(cache.get_user(&user_id, None), Some(data));
    }

    // *For any* user ID, a read once the threshold has elapsed misses even
    // though the entry is still stored.
    #[test]
    fn prop_user_stale_after_threshold(user_id in id_strategy(), extra in 0i64..10_000) {
        let mut cache = LocalCache::default();
        let now = Utc::now();
        let loaded = now - Duration::seconds(TEST_THRESHOLD as i64 + extra);
        cache.save_user_at(user_id.clone(), user(&user_id, "Sam"), loaded);

        prop_assert!(cache.get_user_at(&user_id, Some(TEST_THRESHOLD), now).is_none());
        prop_assert_eq!(cache.user_count(), 1);
    }

    // *For any* ID list, valid items and refresh IDs cover the list exactly,
    // with no overlap, no omission, and candidate order kept in each part.
    #[test]
    fn prop_lookup_partitions_ids(
        seeded in unique_ids_strategy(40)
            .prop_flat_map(|ids| {
                let len = ids.len();
                (Just(ids), prop::collection::vec(seed_strategy(), len))
            })
    ) {
        let (ids, seeds) = seeded;
        let mut cache = LocalCache::default();
        let now = Utc::now();

        for (id, seed) in ids.iter().zip(&seeds) {
            let key = ItemKey::by_ids([id.clone()]);
            match seed {
                Seed::Absent => {}
                Seed::Fresh => cache.save_items_at(&key, infos(&[id.clone()]), now),
                Seed::Stale => cache.save_items_at(
                    &key,
                    infos(&[id.clone()]),
                    now - Duration::seconds(TEST_THRESHOLD as i64),
                ),
            }
        }

        let lookup = cache.get_items_at(&ItemKey::ById(ids.clone()), Some(TEST_THRESHOLD), now);

        let valid = ids_of(&lookup.valid_items);
        let expected_valid: Vec<String> = ids
            .iter()
            .zip(&seeds)
            .filter(|(_, seed)| matches!(seed, Seed::Fresh))
            .map(|(id, _)| id.clone())
            .collect();
        let expected_refresh: Vec<String> = ids
            .iter()
            .zip(&seeds)
            .filter(|(_, seed)| !matches!(seed, Seed::Fresh))
            .map(|(id, _)| id.clone())
            .collect();

        prop_assert_eq!(&valid, &expected_valid);
        prop_assert_eq!(&lookup.refresh_ids, &expected_refresh);
        prop_assert_eq!(valid.len() + lookup.refresh_ids.len(), ids.len());

        let valid_set: HashSet<_> = valid.iter().collect();
        prop_assert!(lookup.refresh_ids.iter().all(|id| !valid_set.contains(id)));
    }

    // *For any* filter and result list, saving then reading within the window
    // returns the same items in the same order with nothing to refresh.
    #[test]
    fn prop_filter_roundtrip(
        entries in filter_entries_strategy(),
        ids in unique_ids_strategy(20)
    ) {
        prop_assume!(!ids.is_empty());
        let mut cache = LocalCache::default();
        let filter = entries
            .iter()
            .fold(ItemFilter::new(), |f, (k, v)| f.with(k.clone(), v.clone()));
        let key = ItemKey::by_filter(filter);

        cache.save_items(&key, infos(&ids));
        let lookup = cache.get_items(&key, None);

        prop_assert_eq!(ids_of(&lookup.valid_items), ids);
        prop_assert!(lookup.refresh_ids.is_empty());
        prop_assert!(!lookup.needs_fetch());
    }

    // *For any* filter, building it in reverse insertion order resolves to
    // the same index entry.
    #[test]
    fn prop_filter_order_insensitive(
        entries in filter_entries_strategy(),
        ids in unique_ids_strategy(10)
    ) {
        prop_assume!(!ids.is_empty());
        let mut cache = LocalCache::default();
        let forward = entries
            .iter()
            .fold(ItemFilter::new(), |f, (k, v)| f.with(k.clone(), v.clone()));
        let reversed = entries
            .iter()
            .rev()
            .fold(ItemFilter::new(), |f, (k, v)| f.with(k.clone(), v.clone()));

        cache.save_items(&ItemKey::by_filter(forward), infos(&ids));
        let lookup = cache.get_items(&ItemKey::by_filter(reversed), None);

        prop_assert_eq!(ids_of(&lookup.valid_items), ids);
    }

    // *For any* cached item, forcing a reload puts it in refresh IDs no matter
    // how generous the threshold.
    #[test]
    fn prop_force_reload_item_refreshes(id in id_strategy(), threshold in 1u64..u64::MAX) {
        let mut cache = LocalCache::default();
        let key = ItemKey::by_ids([id.clone()]);
        cache.save_items(&key, infos(&[id.clone()]));

        cache.force_reload_item(&id);
        let lookup = cache.get_items(&key, Some(threshold));

        prop_assert!(lookup.valid_items.is_empty());
        prop_assert_eq!(lookup.refresh_ids, vec![id]);
    }

    // *For any* owner result, invalidating one member leaves the index intact:
    // the member moves to refresh IDs and the others stay valid.
    #[test]
    fn prop_owner_index_outlives_item(
        ids in unique_ids_strategy(12),
        pick in any::<prop::sample::Index>()
    ) {
        prop_assume!(ids.len() >= 2);
        let mut cache = LocalCache::default();
        let key = ItemKey::by_owner("owner");
        cache.save_items(&key, infos(&ids));

        let dropped = ids[pick.index(ids.len())].clone();
        cache.force_reload_item(&dropped);

        let lookup = cache.get_items(&key, None);
        let expected: Vec<String> = ids.iter().filter(|id| **id != dropped).cloned().collect();
        prop_assert_eq!(ids_of(&lookup.valid_items), expected);
        prop_assert_eq!(lookup.refresh_ids, vec![dropped]);
    }
}

// == Property Test for Concurrent Operation Correctness ==
// Exercises shared access through Arc<RwLock<LocalCache>>

#[derive(Debug, Clone)]
enum CacheOp {
    Save { id: String, price: u32 },
    Lookup { ids: Vec<String> },
    Reload { id: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    let id = "[a-e]";
    prop_oneof![
        (id, 0u32..1000).prop_map(|(id, price)| CacheOp::Save { id, price }),
        prop::collection::vec(id, 1..5).prop_map(|ids| CacheOp::Lookup { ids }),
        id.prop_map(|id| CacheOp::Reload { id }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // *For any* interleaving of saves, lookups and reloads, every lookup
    // still partitions its candidate list exactly.
    #[test]
    fn prop_concurrent_lookups_partition(operations in prop::collection::vec(cache_op_strategy(), 10..50)) {
        use std::sync::Arc;
        use tokio::sync::RwLock;

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let cache = Arc::new(RwLock::new(LocalCache::default()));
            let mut handles = vec![];

            for op in operations {
                let cache = Arc::clone(&cache);
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Save { id, price } => {
                            let mut cache = cache.write().await;
                            cache.save_items(
                                &ItemKey::by_ids([id.clone()]),
                                vec![item_info(&id, "owner", price as f64)],
                            );
                            Ok::<_, String>(())
                        }
                        CacheOp::Lookup { ids } => {
                            let mut cache = cache.write().await;
                            let lookup = cache.get_items(&ItemKey::ById(ids.clone()), None);
                            let covered = lookup.valid_items.len() + lookup.refresh_ids.len();
                            if covered != ids.len() {
                                return Err(format!("lookup covered {covered} of {} ids", ids.len()));
                            }
                            Ok(())
                        }
                        CacheOp::Reload { id } => {
                            cache.write().await.force_reload_item(&id);
                            Ok(())
                        }
                    }
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            let stats = cache.read().await.stats();
            prop_assert!(stats.total_items <= 5, "Only five distinct IDs exist");
            Ok(())
        })?;
    }
}
