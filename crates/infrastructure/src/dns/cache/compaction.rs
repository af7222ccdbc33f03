use super::storage::QueryCache;
use ferrous_doh_application::ports::ExpiringStore;
use std::sync::atomic::Ordering as AtomicOrdering;
use tokio::time::Instant;
use tracing::debug;

/// Extension methods for QueryCache compaction
impl QueryCache {
    /// Physically remove every expired entry.
    ///
    /// Expired keys are collected under shard read locks first, then removed
    /// one at a time, so writers on other keys wait at most for a single
    /// entry check. An entry refreshed between the two phases is kept.
    ///
    /// Returns the number of entries removed
    pub fn compact(&self) -> usize {
        let now = Instant::now();

        let expired: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| !entry.value().is_fresh(now))
            .map(|entry| entry.key().clone())
            .collect();

        let removed = expired
            .iter()
            .filter(|key| {
                self.entries
                    .remove_if(&key[..], |_, entry| !entry.is_fresh(now))
                    .is_some()
            })
            .count();

        self.metrics
            .compactions
            .fetch_add(1, AtomicOrdering::Relaxed);

        if removed > 0 {
            self.metrics
                .swept
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);

            debug!(
                removed,
                cache_size = self.entries.len(),
                "Cache compaction completed"
            );
        }

        removed
    }
}

impl ExpiringStore for QueryCache {
    fn name(&self) -> &'static str {
        "query_cache"
    }

    fn sweep_expired(&self) -> usize {
        self.compact()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
