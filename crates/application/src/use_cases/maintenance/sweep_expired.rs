use crate::ports::ExpiringStore;
use std::sync::Arc;
use tracing::debug;

/// Physically removes expired entries from every registered store.
pub struct SweepExpiredEntriesUseCase {
    stores: Vec<Arc<dyn ExpiringStore>>,
}

impl SweepExpiredEntriesUseCase {
    pub fn new(stores: Vec<Arc<dyn ExpiringStore>>) -> Self {
        Self { stores }
    }

    /// Returns the total number of entries removed across stores.
    pub fn execute(&self) -> usize {
        self.stores
            .iter()
            .map(|store| {
                let removed = store.sweep_expired();
                debug!(
                    store = store.name(),
                    removed,
                    remaining = store.len(),
                    "Expiry sweep finished"
                );
                removed
            })
            .sum()
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }
}
