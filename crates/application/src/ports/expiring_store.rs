/// In-memory store whose entries expire and need periodic physical removal.
pub trait ExpiringStore: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Remove every expired entry. Returns the number removed.
    fn sweep_expired(&self) -> usize;

    /// Entries currently held, expired or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
