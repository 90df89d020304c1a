//! Client Module
//!
//! Cache-aware reads and the cache side effects of mutations. The store holds
//! what was last fetched; this layer decides when the network is consulted.

mod flight;

#[cfg(test)]
mod mock;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ItemFilter, ItemKey, LocalCache};
use crate::error::{Error, Result};
use crate::images::{diff_images, ImageRef, ImageStore};
use crate::location::LocationProvider;
use crate::models::{ItemDraft, ItemInfo, ItemUpdate, UserData, UserUpdate};
use crate::source::RemoteApi;

pub use flight::SingleFlight;

/// An item's image set before and after an edit.
#[derive(Debug, Clone)]
pub struct ImageEdit {
    /// Stored names currently on the item
    pub previous: Vec<String>,
    /// The edited set, in display order
    pub next: Vec<ImageRef>,
}

/// Result of a like or unlike.
///
/// The cached item is patched immediately; the server call runs in the
/// background and its failure is only logged.
#[derive(Debug)]
pub struct Optimistic {
    /// The patched cached item, `None` when it was not cached
    pub item: Option<ItemInfo>,
    /// Background server call
    pub sync: JoinHandle<()>,
}

/// Marketplace client state shared by every screen.
///
/// Contains the cache store wrapped in Arc<RwLock<>>. The lock is never held
/// across a network call, so store operations never interleave.
#[derive(Clone)]
pub struct MarketClient {
    /// Shared cache store
    pub cache: Arc<RwLock<LocalCache>>,
    api: Arc<dyn RemoteApi>,
    location: Arc<dyn LocationProvider>,
    images: Arc<dyn ImageStore>,
    item_flights: Arc<SingleFlight<Vec<ItemInfo>>>,
    user_flights: Arc<SingleFlight<UserData>>,
}

impl MarketClient {
    /// Creates a client around an existing cache store.
    pub fn new(
        cache: LocalCache,
        api: Arc<dyn RemoteApi>,
        location: Arc<dyn LocationProvider>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            api,
            location,
            images,
            item_flights: Arc::new(SingleFlight::new()),
            user_flights: Arc::new(SingleFlight::new()),
        }
    }

    // == Users ==
    /// Returns the user from cache when fresh, otherwise fetches and caches it.
    pub async fn get_user(&self, user_id: &str, threshold: Option<u64>) -> Result<UserData> {
        // Write lock (needed for stats update)
        let cached = self.cache.write().await.get_user(user_id, threshold);
        if let Some(user) = cached {
            return Ok(user);
        }

        let api = Arc::clone(&self.api);
        let target = user_id.to_string();
        let user = self
            .user_flights
            .run(format!("user:{user_id}"), move || async move {
                api.get_user(&target).await
            })
            .await?;

        self.cache.write().await.save_user(user_id, user.clone());
        Ok(user)
    }

    /// Updates the user's profile server-side and drops the cached copy.
    pub async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<()> {
        self.api.update_user(user_id, &update).await?;
        self.cache.write().await.force_reload_user(user_id);
        Ok(())
    }

    // == Items ==
    pub async fn get_items_from_ids(
        &self,
        item_ids: Vec<String>,
        threshold: Option<u64>,
    ) -> Result<Vec<ItemInfo>> {
        self.get_items(ItemKey::ById(item_ids), threshold).await
    }

    pub async fn get_items_from_user(
        &self,
        user_id: &str,
        threshold: Option<u64>,
    ) -> Result<Vec<ItemInfo>> {
        self.get_items(ItemKey::by_owner(user_id), threshold).await
    }

    pub async fn get_items_from_filter(
        &self,
        filter: ItemFilter,
        threshold: Option<u64>,
    ) -> Result<Vec<ItemInfo>> {
        self.get_items(ItemKey::by_filter(filter), threshold).await
    }

    /// Cache-aware item read.
    ///
    /// Only stale or missing entries are fetched. The result lists freshly
    /// fetched items first, then the cached items that were still valid.
    pub async fn get_items(&self, key: ItemKey, threshold: Option<u64>) -> Result<Vec<ItemInfo>> {
        let lookup = self.cache.write().await.get_items(&key, threshold);

        if !lookup.needs_fetch() {
            debug!(key = %key.flight_key(), count = lookup.valid_items.len(), "served from cache");
            return Ok(lookup.valid_items);
        }

        let request = if lookup.cold {
            key.clone()
        } else {
            ItemKey::ById(lookup.refresh_ids.clone())
        };
        let fetched = self.fetch(request.clone()).await?;

        let mut merged = fetched.clone();
        merged.extend(lookup.valid_items);

        {
            let mut cache = self.cache.write().await;
            if lookup.cold {
                cache.save_items(&key, fetched);
            } else {
                // Index keeps its stored order, minus IDs the server dropped
                let returned: HashSet<&str> = merged.iter().map(|i| i.id()).collect();
                let index = lookup
                    .candidates
                    .iter()
                    .filter(|id| returned.contains(id.as_str()))
                    .cloned()
                    .collect();
                // Only the refreshed entries get a new load time
                cache.save_items(&request, fetched);
                cache.save_index(&key, index);
            }
        }

        Ok(merged)
    }

    /// One network round trip for `request`, shared with identical
    /// concurrent requests.
    async fn fetch(&self, request: ItemKey) -> Result<Vec<ItemInfo>> {
        let coords = self.location.current().await?;
        let api = Arc::clone(&self.api);
        let flight_key = request.flight_key();

        info!(request = %flight_key, "fetching items from remote API");
        self.item_flights
            .run(flight_key, move || async move {
                match &request {
                    ItemKey::ById(ids) => api.items_from_ids(ids, coords).await,
                    ItemKey::ByOwner(user_id) => api.items_from_user(user_id, coords).await,
                    ItemKey::ByFilter(filter) => api.items_from_filter(filter, coords).await,
                }
            })
            .await
    }

    // == Item Mutations ==
    /// Lists a new item and uploads its local images under the new ID.
    ///
    /// Nothing is cached; the next read of the item fetches it.
    pub async fn create_item(&self, draft: ItemDraft, images: Vec<PathBuf>) -> Result<String> {
        if let Some(error_msg) = draft.validate() {
            return Err(Error::InvalidRequest(error_msg));
        }

        let item_id = self.api.create_item(&draft).await?;
        for path in &images {
            self.images.upload(&item_id, path).await?;
        }

        info!(item_id = %item_id, images = images.len(), "item created");
        Ok(item_id)
    }

    /// Updates a listing and invalidates its cached entry.
    ///
    /// With an image edit, new local images are uploaded first so the server
    /// receives the final stored names; removed images are deleted after the
    /// server accepted the update. A failed image delete is logged and does
    /// not fail the update, which has already been applied.
    pub async fn update_item(
        &self,
        item_id: &str,
        mut update: ItemUpdate,
        images: Option<ImageEdit>,
    ) -> Result<()> {
        let mut deletes = Vec::new();

        if let Some(edit) = images {
            let diff = diff_images(&edit.previous, &edit.next);
            debug!(
                item_id,
                uploads = diff.uploads.len(),
                deletes = diff.deletes.len(),
                "image diff"
            );

            let mut uploaded = Vec::with_capacity(diff.uploads.len());
            for path in &diff.uploads {
                uploaded.push(self.images.upload(item_id, path).await?);
            }

            // Stored names in display order, uploads filling the local slots
            let mut uploaded = uploaded.into_iter();
            let names = edit
                .next
                .iter()
                .filter_map(|image| match image {
                    ImageRef::Stored(name) => Some(name.clone()),
                    ImageRef::Local(_) => uploaded.next(),
                })
                .collect();
            update.images = Some(names);
            deletes = diff.deletes;
        }

        self.api.update_item(item_id, &update).await?;
        self.cache.write().await.force_reload_item(item_id);

        self.delete_images(item_id, &deletes).await;
        Ok(())
    }

    /// Deletes a listing, its stored images, and its cached entry.
    ///
    /// Image cleanup failures are logged; the listing is gone either way.
    pub async fn delete_item(&self, item_id: &str, images: &[String]) -> Result<()> {
        self.api.delete_item(item_id).await?;
        self.cache.write().await.force_reload_item(item_id);

        self.delete_images(item_id, images).await;
        info!(item_id, "item deleted");
        Ok(())
    }

    /// Best-effort removal of stored images after a server-side mutation.
    async fn delete_images(&self, item_id: &str, names: &[String]) {
        for name in names {
            if let Err(err) = self.images.delete(item_id, name).await {
                warn!(item_id, image = %name, error = %err, "image not deleted");
            }
        }
    }

    /// Likes an item: patches the cached entry, then tells the server.
    pub async fn like_item(&self, item_id: &str) -> Optimistic {
        let now = Utc::now();
        let item = self
            .cache
            .write()
            .await
            .update_item_entry(item_id, |info| info.apply_like(now));

        let api = Arc::clone(&self.api);
        let target = item_id.to_string();
        let sync = tokio::spawn(async move {
            if let Err(err) = api.like_item(&target).await {
                warn!(item_id = %target, error = %err, "like not recorded by server");
            }
        });

        Optimistic { item, sync }
    }

    /// Unlikes an item: patches the cached entry, then tells the server.
    pub async fn unlike_item(&self, item_id: &str) -> Optimistic {
        let item = self
            .cache
            .write()
            .await
            .update_item_entry(item_id, |info| info.apply_unlike());

        let api = Arc::clone(&self.api);
        let target = item_id.to_string();
        let sync = tokio::spawn(async move {
            if let Err(err) = api.unlike_item(&target).await {
                warn!(item_id = %target, error = %err, "unlike not recorded by server");
            }
        });

        Optimistic { item, sync }
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}
