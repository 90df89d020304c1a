//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::FreshnessPolicy;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote data API
    pub api_base_url: String,
    /// Freshness threshold in seconds for cached users
    pub user_reload_threshold: u64,
    /// Freshness threshold in seconds for cached items
    pub item_reload_threshold: u64,
    /// Transport timeout in seconds for remote calls
    pub request_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Remote API base URL (default: http://localhost:8080)
    /// - `USER_RELOAD_THRESHOLD` - User freshness in seconds (default: 300)
    /// - `ITEM_RELOAD_THRESHOLD` - Item freshness in seconds (default: 300)
    /// - `REQUEST_TIMEOUT` - Transport timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            user_reload_threshold: env::var("USER_RELOAD_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.user_reload_threshold),
            item_reload_threshold: env::var("ITEM_RELOAD_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.item_reload_threshold),
            request_timeout: env::var("REQUEST_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Freshness policy built from the configured thresholds.
    pub fn freshness(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(self.user_reload_threshold, self.item_reload_threshold)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            user_reload_threshold: 300,
            item_reload_threshold: 300,
            request_timeout: 30,
        }
    }
}
