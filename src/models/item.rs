//! Item models
//!
//! `Item` is the listing as its owner published it. `ItemInfo` joins it with
//! the current viewer's relationship to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A marketplace listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item ID
    pub id: String,
    /// Owning user
    #[serde(rename = "userID")]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stored image names, in display order
    #[serde(default)]
    pub images: Vec<String>,
    /// Number of users who liked the item
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub views: u32,
    pub created: DateTime<Utc>,
}

/// An item joined with the viewer-relative fields the server computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    pub item: Item,
    /// Distance from the viewer, computed server-side from the query coords
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub like_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub view_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fav_time: Option<DateTime<Utc>>,
    /// Price of the item at the moment the viewer liked it
    #[serde(default)]
    pub like_price: Option<f64>,
    #[serde(default)]
    pub load_time: Option<DateTime<Utc>>,
}

impl ItemInfo {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            distance: None,
            like_time: None,
            view_time: None,
            fav_time: None,
            like_price: None,
            load_time: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn is_liked(&self) -> bool {
        self.like_time.is_some()
    }

    /// Marks the item as liked by the viewer at its current price.
    ///
    /// Liking an already-liked item is a no-op.
    pub fn apply_like(&mut self, now: DateTime<Utc>) {
        if self.is_liked() {
            return;
        }
        self.item.likes = self.item.likes.saturating_add(1);
        self.like_time = Some(now);
        self.like_price = Some(self.item.price);
    }

    /// Clears the viewer's like. Unliking an item that is not liked is a no-op.
    pub fn apply_unlike(&mut self) {
        if !self.is_liked() {
            return;
        }
        self.item.likes = self.item.likes.saturating_sub(1);
        self.like_time = None;
        self.like_price = None;
    }
}

/// Fields supplied when listing a new item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub condition: String,
    pub size: String,
    pub gender: String,
    pub tags: Vec<String>,
}

impl ItemDraft {
    /// Validates the draft before it is sent.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Item name cannot be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Some("Item price must be a non-negative number".to_string());
        }
        None
    }
}

/// Partial update of a listing; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Final stored image names, set by the client after uploading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}
