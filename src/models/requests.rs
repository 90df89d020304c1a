//! Request and response bodies for the remote API
//!
//! Every item query carries the viewer's coords so the server can compute
//! distances.

use serde::{Deserialize, Serialize};

use super::{Coords, ItemUpdate, UserUpdate};
use crate::cache::ItemFilter;

/// Body for `getItemsFromIDs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemIdsRequest {
    #[serde(rename = "itemIDs")]
    pub item_ids: Vec<String>,
    pub coords: Coords,
}

/// Body for `getItemsFromUser`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRequest {
    #[serde(rename = "targetUserID")]
    pub target_user_id: String,
    pub coords: Coords,
}

/// Body for `getItemsFromFilter`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub filters: ItemFilter,
    pub coords: Coords,
}

/// Body for `getUser`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    #[serde(rename = "targetUserID")]
    pub target_user_id: String,
}

/// Body for `updateUser`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(flatten)]
    pub update: UserUpdate,
}

/// Body for `updateItem`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(rename = "itemID")]
    pub item_id: String,
    #[serde(flatten)]
    pub update: ItemUpdate,
}

/// Body for `deleteItem`, `likeItem` and `unlikeItem`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemIdRequest {
    #[serde(rename = "itemID")]
    pub item_id: String,
}

/// Response of `createItem`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedItem {
    #[serde(rename = "itemID")]
    pub item_id: String,
}

/// Error body returned with any non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Server-supplied error code
    pub error: String,
}
