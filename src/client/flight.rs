//! Single-flight request collapsing
//!
//! Concurrent callers asking for the same canonical request share one
//! pending fetch instead of each going to the network.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T>>>;

/// In-flight fetches keyed by canonical request key.
///
/// An entry lives only while its fetch is outstanding; the first caller to
/// drive it to completion removes it.
pub struct SingleFlight<T> {
    in_flight: Arc<Mutex<HashMap<String, SharedFetch<T>>>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Runs `fetch` unless a fetch for `key` is already pending, in which
    /// case its outcome is shared.
    pub async fn run<F, Fut>(&self, key: String, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let shared = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&key) {
                Some(pending) => {
                    debug!(key = %key, "joining in-flight fetch");
                    pending.clone()
                }
                None => {
                    let registry = Arc::clone(&self.in_flight);
                    let done_key = key.clone();
                    let fut = fetch();
                    let shared = async move {
                        let result = fut.await;
                        registry.lock().await.remove(&done_key);
                        result
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(key, shared.clone());
                    shared
                }
            }
        };

        shared.await
    }

    /// Number of fetches currently outstanding.
    pub async fn pending(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
