//! In-memory collaborators for orchestration tests

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::ItemFilter;
use crate::error::{Error, Result};
use crate::images::ImageStore;
use crate::models::{Coords, ItemDraft, ItemInfo, ItemUpdate, UserData, UserUpdate};
use crate::source::RemoteApi;

/// Remote API backed by maps, recording every call it receives.
#[derive(Default)]
pub struct MockApi {
    pub items: Mutex<Vec<ItemInfo>>,
    pub users: Mutex<HashMap<String, UserData>>,
    pub calls: Mutex<Vec<String>>,
    pub coords: Mutex<Vec<Coords>>,
    pub fail_with: Mutex<Option<String>>,
    pub delay: Duration,
}

impl MockApi {
    pub fn with_items(items: Vec<ItemInfo>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail(&self, code: &str) {
        *self.fail_with.lock().unwrap() = Some(code.to_string());
    }

    async fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.fail_with.lock().unwrap().clone() {
            Some(code) => Err(Error::Api { code }),
            None => Ok(()),
        }
    }

    fn matching<P: Fn(&ItemInfo) -> bool>(&self, predicate: P) -> Vec<ItemInfo> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|info| predicate(info))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn items_from_ids(&self, item_ids: &[String], coords: Coords) -> Result<Vec<ItemInfo>> {
        self.coords.lock().unwrap().push(coords);
        self.record(format!("ids:{}", item_ids.join(","))).await?;
        // Server answers in request order and omits unknown IDs
        let items = self.matching(|_| true);
        Ok(item_ids
            .iter()
            .filter_map(|id| items.iter().find(|info| info.id() == id).cloned())
            .collect())
    }

    async fn items_from_user(&self, user_id: &str, coords: Coords) -> Result<Vec<ItemInfo>> {
        self.coords.lock().unwrap().push(coords);
        self.record(format!("owner:{user_id}")).await?;
        Ok(self.matching(|info| info.item.user_id == user_id))
    }

    async fn items_from_filter(
        &self,
        filter: &ItemFilter,
        coords: Coords,
    ) -> Result<Vec<ItemInfo>> {
        self.coords.lock().unwrap().push(coords);
        self.record(format!("filter:{}", filter.canonical())).await?;
        let size = filter.get("size").and_then(|v| v.as_str()).map(str::to_string);
        Ok(self.matching(|info| size.as_deref().map_or(true, |s| info.item.size == s)))
    }

    async fn get_user(&self, user_id: &str) -> Result<UserData> {
        self.record(format!("user:{user_id}")).await?;
        self.users
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::Api {
                code: "user-not-found".to_string(),
            })
    }

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<()> {
        self.record(format!("update-user:{user_id}")).await?;
        if let Some(user) = self.users.lock().unwrap().get_mut(user_id) {
            if let Some(name) = &update.name {
                user.name = name.clone();
            }
        }
        Ok(())
    }

    async fn create_item(&self, draft: &ItemDraft) -> Result<String> {
        self.record(format!("create:{}", draft.name)).await?;
        Ok("new-item".to_string())
    }

    async fn update_item(&self, item_id: &str, update: &ItemUpdate) -> Result<()> {
        self.record(format!("update:{item_id}")).await?;
        let mut items = self.items.lock().unwrap();
        if let Some(info) = items.iter_mut().find(|info| info.id() == item_id) {
            if let Some(price) = update.price {
                info.item.price = price;
            }
            if let Some(images) = &update.images {
                info.item.images = images.clone();
            }
        }
        Ok(())
    }

    async fn delete_item(&self, item_id: &str) -> Result<()> {
        self.record(format!("delete:{item_id}")).await?;
        self.items.lock().unwrap().retain(|info| info.id() != item_id);
        Ok(())
    }

    async fn like_item(&self, item_id: &str) -> Result<()> {
        self.record(format!("like:{item_id}")).await
    }

    async fn unlike_item(&self, item_id: &str) -> Result<()> {
        self.record(format!("unlike:{item_id}")).await
    }
}

/// Image store recording uploads and deletes.
#[derive(Default)]
pub struct MockImages {
    pub uploads: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
    pub fail_deletes: Mutex<bool>,
}

#[async_trait]
impl ImageStore for MockImages {
    async fn upload(&self, item_id: &str, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Image(format!("bad path {}", path.display())))?
            .to_string();
        self.uploads.lock().unwrap().push(format!("{item_id}/{name}"));
        Ok(name)
    }

    async fn delete(&self, item_id: &str, name: &str) -> Result<()> {
        if *self.fail_deletes.lock().unwrap() {
            return Err(Error::Image(format!("bucket refused {item_id}/{name}")));
        }
        self.deletes.lock().unwrap().push(format!("{item_id}/{name}"));
        Ok(())
    }
}
