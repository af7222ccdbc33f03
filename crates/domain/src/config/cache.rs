use serde::{Deserialize, Serialize};

/// Response cache and pending-key index configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Seconds a response stays fresh (default: 30)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Interval between expiry sweeps in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Lifetime of an idle per-query lock in seconds (default: 10)
    #[serde(default = "default_pending_ttl_secs")]
    pub pending_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            pending_ttl_secs: default_pending_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    30
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_pending_ttl_secs() -> u64 {
    10
}
