//! Market Cache - local data cache for a second-hand clothing marketplace client
//!
//! Keeps the items and users a client has fetched, decides per entry whether
//! the cached copy is still fresh, and only goes to the remote API for what
//! is stale or missing.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod images;
pub mod location;
pub mod models;
pub mod source;
pub mod telemetry;

pub use cache::{FreshnessPolicy, ItemFilter, ItemKey, ItemLookup, LocalCache};
pub use client::{ImageEdit, MarketClient, Optimistic};
pub use config::Config;
pub use error::{Error, Result};
pub use source::{HttpApi, RemoteApi};
pub use telemetry::init_tracing;
