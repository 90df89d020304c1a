//! Logging setup
//!
//! The library only emits `tracing` events; the host application installs a
//! subscriber once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "market_cache=info";

/// Installs a formatting subscriber with an env filter.
///
/// Defaults to `market_cache=info`, can be overridden with the RUST_LOG env
/// var. Returns false when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
