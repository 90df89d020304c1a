//! Data models shared by the cache and the remote API
//!
//! The cache reuses the same JSON shapes the remote API returns, so these
//! types serve both as cached values and as wire bodies.

pub mod coords;
pub mod item;
pub mod requests;
pub mod user;

// Re-export commonly used types
pub use coords::Coords;
pub use item::{Item, ItemDraft, ItemInfo, ItemUpdate};
pub use requests::{
    CreatedItem, ErrorBody, FilterRequest, ItemIdRequest, ItemIdsRequest, OwnerRequest,
    UpdateItemRequest, UpdateUserRequest, UserRequest,
};
pub use user::{UserData, UserUpdate};
