//! Error types for the marketplace client
//!
//! Provides unified error handling using thiserror. Cache misses are never
//! errors; only remote calls and their collaborators fail.

use std::sync::Arc;

use thiserror::Error;

// == Error Enum ==
/// Unified error type for remote calls made on behalf of the cache.
///
/// `Clone` so a single in-flight fetch can hand the same outcome to every
/// waiting caller.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The remote API rejected the call with a server-supplied code
    #[error("API error: {code}")]
    Api { code: String },

    /// The request never produced a usable HTTP response
    #[error("Transport error: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    /// The geolocation provider could not supply coordinates
    #[error("Location unavailable: {0}")]
    Location(String),

    /// Image storage upload or delete failed
    #[error("Image storage error: {0}")]
    Image(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Returns the server error code, if the failure came from the API.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Api { code } => Some(code.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(Arc::new(err))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the marketplace client.
pub type Result<T> = std::result::Result<T, Error>;
