//! TTL cache with one expiry timer per key.
//!
//! Every `put` or `get` of a key cancels that key's pending timer and
//! starts a new one, so each key expires `ttl` after its own last access
//! regardless of traffic on other keys. Each slot carries a generation
//! number; a timer that fires after its slot was refreshed sees a newer
//! generation and leaves the entry alone.
//!
//! Timers are tokio tasks, so `put` and `get` must run inside a tokio
//! runtime.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::Closeable;
use crate::config::ResamplerConfig;
use crate::types::CacheStats;

struct Slot<R> {
    resource: Arc<R>,
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

type Entries<K, R> = Arc<Mutex<HashMap<K, Slot<R>>>>;

/// Keyed cache of closeable resources with per-key expiry.
///
/// A resource is closed exactly once: on expiry, on `remove`, when
/// displaced by a `put` of the same key, or by `close_all`. Close failures
/// are logged and never propagate.
pub struct ExpiringCache<K, R> {
    entries: Entries<K, R>,
    ttl: Duration,
    next_generation: AtomicU64,
    counters: Arc<Counters>,
}

impl<K, R> ExpiringCache<K, R>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    R: Closeable + 'static,
{
    /// Create a cache that closes resources `ttl` after their last access.
    pub fn new(ttl: Duration) -> Self {
        info!(ttl_secs = ttl.as_secs(), "Initializing expiring resource cache");
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            next_generation: AtomicU64::new(0),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Create a cache using the configured TTL.
    pub fn from_config(config: &ResamplerConfig) -> Self {
        Self::new(config.cache_ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `resource` under `key` and start its TTL.
    ///
    /// A resource already stored under `key` is closed.
    pub async fn put(&self, key: K, resource: R) -> Arc<R> {
        let resource = Arc::new(resource);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        let displaced = {
            let mut entries = self.entries.lock().await;
            let timer = self.schedule(key.clone(), generation);
            entries.insert(
                key.clone(),
                Slot {
                    resource: Arc::clone(&resource),
                    generation,
                    timer,
                },
            )
        };

        if let Some(old) = displaced {
            old.timer.abort();
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(?key, "Replacing cached resource");
            close_logged(&key, old.resource.as_ref());
        }

        resource
    }

    /// Look up `key`, restarting its TTL on a hit.
    pub async fn get(&self, key: &K) -> Option<Arc<R>> {
        let mut entries = self.entries.lock().await;
        let Some(slot) = entries.get_mut(key) else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        slot.timer.abort();
        slot.timer = self.schedule(key.clone(), generation);
        slot.generation = generation;
        Some(Arc::clone(&slot.resource))
    }

    /// Close and evict `key`. Returns whether it was present.
    pub async fn remove(&self, key: &K) -> bool {
        let slot = self.entries.lock().await.remove(key);
        match slot {
            Some(slot) => {
                slot.timer.abort();
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(?key, "Evicting cached resource");
                close_logged(key, slot.resource.as_ref());
                true
            }
            None => false,
        }
    }

    /// Whether `key` is cached. Does not refresh its TTL.
    pub async fn contains(&self, key: &K) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Close and evict every resource. Returns how many were closed.
    pub async fn close_all(&self) -> usize {
        let drained: Vec<(K, Slot<R>)> = self.entries.lock().await.drain().collect();
        let count = drained.len();
        for (key, slot) in drained {
            slot.timer.abort();
            close_logged(&key, slot.resource.as_ref());
        }
        self.counters
            .evictions
            .fetch_add(count as u64, Ordering::Relaxed);
        if count > 0 {
            info!(closed = count, "Closed all cached resources");
        }
        count
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            entries: self.len().await,
        }
    }

    fn schedule(&self, key: K, generation: u64) -> JoinHandle<()> {
        let entries = Arc::clone(&self.entries);
        let counters = Arc::clone(&self.counters);
        let ttl = self.ttl;

        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;

            let expired = {
                let mut entries = entries.lock().await;
                match entries.get(&key) {
                    Some(slot) if slot.generation == generation => entries.remove(&key),
                    _ => None,
                }
            };

            if let Some(slot) = expired {
                counters.expirations.fetch_add(1, Ordering::Relaxed);
                debug!(?key, "Cached resource expired");
                close_logged(&key, slot.resource.as_ref());
            }
        })
    }
}

fn close_logged<K: Debug, R: Closeable>(key: &K, resource: &R) {
    if let Err(e) = resource.close() {
        warn!(?key, error = %e, "Failed to close cached resource");
    }
}
