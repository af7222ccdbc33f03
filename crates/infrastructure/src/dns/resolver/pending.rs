use bytes::Bytes;
use dashmap::DashMap;
use ferrous_doh_application::ports::ExpiringStore;
use rustc_hash::FxBuildHasher;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tokio::time::Instant;
use tracing::debug;

/// Lock object for one query key.
///
/// Callers keep an `Arc<PendingKey>` while they wait for or hold the lock,
/// which is what the sweep checks before removing an entry.
pub struct PendingKey {
    lock: AsyncMutex<()>,
    expires_at: Mutex<Instant>,
}

impl PendingKey {
    fn new(expires_at: Instant) -> Self {
        Self {
            lock: AsyncMutex::new(()),
            expires_at: Mutex::new(expires_at),
        }
    }

    /// Wait for exclusive access to this key. Released when the guard drops.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    pub fn is_locked(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    fn touch(&self, expires_at: Instant) {
        *self
            .expires_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = expires_at;
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= *self
            .expires_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Index of per-key locks, bounded to recently active keys.
pub struct PendingKeyIndex {
    keys: DashMap<Bytes, Arc<PendingKey>, FxBuildHasher>,
    ttl: Duration,
}

impl PendingKeyIndex {
    /// `ttl` is how long an idle key stays in the index after its last use.
    pub fn new(ttl: Duration) -> Self {
        Self {
            keys: DashMap::with_hasher(FxBuildHasher),
            ttl,
        }
    }

    /// Get or create the lock object for `key` and refresh its expiry.
    ///
    /// Creation is atomic: racing callers always end up with the same
    /// `PendingKey`.
    pub fn acquire(&self, key: &Bytes) -> Arc<PendingKey> {
        let now = Instant::now();
        let expires_at = now + self.ttl;

        let pending = match self.keys.get(&key[..]) {
            Some(existing) => Arc::clone(existing.value()),
            None => Arc::clone(
                self.keys
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(PendingKey::new(expires_at)))
                    .value(),
            ),
        };

        pending.touch(expires_at);
        pending
    }

    /// Remove expired keys that no caller references.
    ///
    /// The reference count is read under the shard write lock, where no new
    /// clone can be taken, so a key whose lock is held or awaited is never
    /// removed.
    pub fn compact(&self) -> usize {
        let now = Instant::now();

        let candidates: Vec<Bytes> = self
            .keys
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        let removed = candidates
            .iter()
            .filter(|key| {
                self.keys
                    .remove_if(&key[..], |_, pending| {
                        Arc::strong_count(pending) == 1 && pending.is_expired(now)
                    })
                    .is_some()
            })
            .count();

        if removed > 0 {
            debug!(
                removed,
                remaining = self.keys.len(),
                "Pending key index compacted"
            );
        }

        removed
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.keys.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl ExpiringStore for PendingKeyIndex {
    fn name(&self) -> &'static str {
        "pending_keys"
    }

    fn sweep_expired(&self) -> usize {
        self.compact()
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}
