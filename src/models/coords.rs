//! Coarse viewer coordinates
//!
//! Sent with every item query so the server can compute `distance`.

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair as supplied by the geolocation provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub long: f64,
}

impl Coords {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }
}
