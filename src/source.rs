//! Remote data API
//!
//! All business logic lives server-side behind cloud-run style functions:
//! `POST {base_url}/{function}` with a JSON body and a bearer token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::ItemFilter;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{
    Coords, CreatedItem, ErrorBody, FilterRequest, ItemDraft, ItemIdRequest, ItemIdsRequest,
    ItemInfo, ItemUpdate, OwnerRequest, UpdateItemRequest, UpdateUserRequest, UserData,
    UserRequest, UserUpdate,
};

// == Function Names ==
pub const GET_ITEMS_FROM_IDS: &str = "getItemsFromIDs";
pub const GET_ITEMS_FROM_USER: &str = "getItemsFromUser";
pub const GET_ITEMS_FROM_FILTER: &str = "getItemsFromFilter";
pub const GET_USER: &str = "getUser";
pub const UPDATE_USER: &str = "updateUser";
pub const CREATE_ITEM: &str = "createItem";
pub const UPDATE_ITEM: &str = "updateItem";
pub const DELETE_ITEM: &str = "deleteItem";
pub const LIKE_ITEM: &str = "likeItem";
pub const UNLIKE_ITEM: &str = "unlikeItem";

/// The remote calls the cache layer makes on behalf of its callers.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn items_from_ids(&self, item_ids: &[String], coords: Coords) -> Result<Vec<ItemInfo>>;

    async fn items_from_user(&self, user_id: &str, coords: Coords) -> Result<Vec<ItemInfo>>;

    async fn items_from_filter(&self, filter: &ItemFilter, coords: Coords)
        -> Result<Vec<ItemInfo>>;

    async fn get_user(&self, user_id: &str) -> Result<UserData>;

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<()>;

    /// Creates a listing and returns its new ID.
    async fn create_item(&self, draft: &ItemDraft) -> Result<String>;

    async fn update_item(&self, item_id: &str, update: &ItemUpdate) -> Result<()>;

    async fn delete_item(&self, item_id: &str) -> Result<()>;

    async fn like_item(&self, item_id: &str) -> Result<()>;

    async fn unlike_item(&self, item_id: &str) -> Result<()>;
}

// == HTTP API ==
/// `RemoteApi` over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpApi {
    /// Creates a client for `base_url` with a transport timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    /// Sets the bearer token sent with every call; `None` signs out.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    fn url(&self, function: &str) -> String {
        format!("{}/{}", self.base_url, function)
    }

    /// Posts `body` to `function` and returns the raw success body.
    async fn post<B>(&self, function: &str, body: &B) -> Result<Vec<u8>>
    where
        B: Serialize + Sync,
    {
        let mut request = self.client.post(self.url(function)).json(body);
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }

        debug!(function, "calling remote API");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?.to_vec();

        if !status.is_success() {
            let code = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("http-{}", status.as_u16()));
            warn!(function, status = status.as_u16(), code = %code, "remote API error");
            return Err(Error::Api { code });
        }

        Ok(bytes)
    }

    async fn call<B, T>(&self, function: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let bytes = self.post(function, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Like `call` but ignores whatever the server returns on success.
    async fn call_unit<B>(&self, function: &str, body: &B) -> Result<()>
    where
        B: Serialize + Sync,
    {
        self.post(function, body).await.map(|_| ())
    }
}

#[async_trait]
impl RemoteApi for HttpApi {
    async fn items_from_ids(&self, item_ids: &[String], coords: Coords) -> Result<Vec<ItemInfo>> {
        let body = ItemIdsRequest {
            item_ids: item_ids.to_vec(),
            coords,
        };
        self.call(GET_ITEMS_FROM_IDS, &body).await
    }

    async fn items_from_user(&self, user_id: &str, coords: Coords) -> Result<Vec<ItemInfo>> {
        let body = OwnerRequest {
            target_user_id: user_id.to_string(),
            coords,
        };
        self.call(GET_ITEMS_FROM_USER, &body).await
    }

    async fn items_from_filter(
        &self,
        filter: &ItemFilter,
        coords: Coords,
    ) -> Result<Vec<ItemInfo>> {
        let body = FilterRequest {
            filters: filter.clone(),
            coords,
        };
        self.call(GET_ITEMS_FROM_FILTER, &body).await
    }

    async fn get_user(&self, user_id: &str) -> Result<UserData> {
        let body = UserRequest {
            target_user_id: user_id.to_string(),
        };
        self.call(GET_USER, &body).await
    }

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<()> {
        let body = UpdateUserRequest {
            user_id: user_id.to_string(),
            update: update.clone(),
        };
        self.call_unit(UPDATE_USER, &body).await
    }

    async fn create_item(&self, draft: &ItemDraft) -> Result<String> {
        let created: CreatedItem = self.call(CREATE_ITEM, draft).await?;
        Ok(created.item_id)
    }

    async fn update_item(&self, item_id: &str, update: &ItemUpdate) -> Result<()> {
        let body = UpdateItemRequest {
            item_id: item_id.to_string(),
            update: update.clone(),
        };
        self.call_unit(UPDATE_ITEM, &body).await
    }

    async fn delete_item(&self, item_id: &str) -> Result<()> {
        let body = ItemIdRequest {
            item_id: item_id.to_string(),
        };
        self.call_unit(DELETE_ITEM, &body).await
    }

    async fn like_item(&self, item_id: &str) -> Result<()> {
        let body = ItemIdRequest {
            item_id: item_id.to_string(),
        };
        self.call_unit(LIKE_ITEM, &body).await
    }

    async fn unlike_item(&self, item_id: &str) -> Result<()> {
        let body = ItemIdRequest {
            item_id: item_id.to_string(),
        };
        self.call_unit(UNLIKE_ITEM, &body).await
    }
}
