//! Geolocation provider
//!
//! Supplies the viewer coords attached to every item query.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::Coords;

/// Source of the viewer's current coarse location.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current(&self) -> Result<Coords>;
}

/// Location provider returning whatever coords were last set.
///
/// Used when the host already tracks position and pushes updates in.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    coords: Arc<RwLock<Coords>>,
}

impl FixedLocation {
    pub fn new(coords: Coords) -> Self {
        Self {
            coords: Arc::new(RwLock::new(coords)),
        }
    }

    /// Replaces the coords reported from now on.
    pub async fn set(&self, coords: Coords) {
        *self.coords.write().await = coords;
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current(&self) -> Result<Coords> {
        Ok(*self.coords.read().await)
    }
}
