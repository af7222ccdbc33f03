pub mod udp;
pub mod udp_pool;

use async_trait::async_trait;
use bytes::Bytes;
use ferrous_doh_domain::DomainError;
use std::time::Duration;

pub use udp::UdpTransport;
pub use udp_pool::{PoolStats, PoolStatsSnapshot, PooledSocket, UdpConnectionPool};

/// Result of a raw DNS transport operation
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// Raw DNS response bytes (wire format)
    pub bytes: Bytes,
    /// Which protocol was used
    pub protocol_used: &'static str,
}

/// Trait for sending raw DNS messages to the upstream resolver
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
