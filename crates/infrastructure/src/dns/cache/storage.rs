use super::CacheMetrics;
use bytes::Bytes;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

const SHARD_AMOUNT: usize = 256;

/// Upper bound for expiry arithmetic so huge TTLs cannot overflow `Instant`.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

pub(super) struct CacheEntry {
    pub(super) response: Bytes,
    pub(super) expires_at: Instant,
}

impl CacheEntry {
    #[inline]
    pub(super) fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// TTL cache from raw query bytes to raw response bytes.
///
/// Freshness is always measured with `tokio::time::Instant`, both on lookup
/// and during compaction, so an entry can never be expired for one and
/// fresh for the other.
pub struct QueryCache {
    pub(super) entries: DashMap<Bytes, CacheEntry, FxBuildHasher>,
    pub(super) metrics: Arc<CacheMetrics>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher_and_shard_amount(FxBuildHasher, SHARD_AMOUNT),
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    /// Fresh response for `key`, or `None`.
    ///
    /// An expired entry found here is removed on the spot.
    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if entry.is_fresh(now) {
                self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Some(entry.response.clone());
            }
            drop(entry);
            self.lazy_remove(key, now);
        }

        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
        None
    }

    /// Like `get` but leaves metrics and expired entries alone.
    pub fn peek(&self, key: &[u8]) -> Option<Bytes> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.response.clone())
    }

    /// Store `response` for `key`, replacing any previous entry. Last writer wins.
    ///
    /// A zero TTL stores an entry that is already expired.
    pub fn insert(&self, key: Bytes, response: Bytes, ttl: Duration) {
        let expires_at = Instant::now() + ttl.min(MAX_TTL);

        self.entries.insert(
            key,
            CacheEntry {
                response,
                expires_at,
            },
        );
        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
    }

    fn lazy_remove(&self, key: &[u8], now: Instant) {
        // A concurrent insert may have refreshed the entry since the read.
        if self
            .entries
            .remove_if(key, |_, entry| !entry.is_fresh(now))
            .is_some()
        {
            self.metrics
                .lazy_deletions
                .fetch_add(1, AtomicOrdering::Relaxed);
            debug!(key_len = key.len(), "Expired cache entry removed on lookup");
        }
    }

    /// Entries physically present, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
