use serde::{Deserialize, Serialize};

/// Upstream resolver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Plain UDP resolver as `host:port` (default: "127.0.0.1:53")
    #[serde(default = "default_address")]
    pub address: String,

    /// Per-attempt write/read timeout in milliseconds (default: 2000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Idle sockets kept for reuse; extra sockets are closed on checkin (default: 64)
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            timeout_ms: default_timeout_ms(),
            max_idle_connections: default_max_idle_connections(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:53".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_max_idle_connections() -> usize {
    64
}
