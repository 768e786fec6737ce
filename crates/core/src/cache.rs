//! Time-bounded snapshot cache for store reads.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Default staleness window for reference data.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(45);

/// Holds the last loaded snapshot for up to `ttl`.
///
/// Loading is single-flight: concurrent callers wait for the one load in
/// progress instead of hitting the store again.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    ttl: Duration,
    slot: Mutex<Option<(Instant, Arc<T>)>>,
}

impl<T> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached snapshot, calling `load` when it is missing or stale.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some((loaded_at, value)) = slot.as_ref() {
            if loaded_at.elapsed() < self.ttl {
                return Ok(Arc::clone(value));
            }
        }
        let value = Arc::new(load().await?);
        *slot = Some((Instant::now(), Arc::clone(&value)));
        Ok(value)
    }

    /// Drop the snapshot so the next read goes to the store.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}
