use super::udp_pool::{PooledSocket, UdpConnectionPool};
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::Bytes;
use ferrous_doh_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport backed by a connection pool.
///
/// A socket that fails or times out is discarded, so a late reply can never
/// be read by the next query that reuses it.
pub struct UdpTransport {
    pool: Arc<UdpConnectionPool>,
}

impl UdpTransport {
    pub fn new(pool: Arc<UdpConnectionPool>) -> Self {
        Self { pool }
    }

    async fn exchange(
        &self,
        pooled: &PooledSocket,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Bytes, DomainError> {
        let socket = pooled.socket();
        let upstream = self.pool.upstream();

        if pooled.is_reused() {
            drain_stale(pooled);
        }

        let bytes_sent = tokio::time::timeout(timeout, socket.send(message_bytes))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| {
                DomainError::Upstream(format!("Failed to send UDP query to {}: {}", upstream, e))
            })?;

        debug!(
            server = %upstream,
            bytes_sent = bytes_sent,
            reused = pooled.is_reused(),
            "UDP query sent"
        );

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        let bytes_received = tokio::time::timeout(timeout, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| DomainError::UpstreamTimeout)?
            .map_err(|e| {
                DomainError::Upstream(format!(
                    "Failed to receive UDP response from {}: {}",
                    upstream, e
                ))
            })?;

        recv_buf.truncate(bytes_received);

        debug!(
            server = %upstream,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(Bytes::from(recv_buf))
    }
}

/// Throw away datagrams that arrived after a previous exchange finished.
fn drain_stale(pooled: &PooledSocket) {
    let mut scratch = [0u8; MAX_UDP_RESPONSE_SIZE];
    let mut dropped = 0usize;
    while pooled.socket().try_recv(&mut scratch).is_ok() {
        dropped += 1;
    }
    if dropped > 0 {
        warn!(dropped, "Discarded stale UDP datagrams on reused socket");
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let pooled = self.pool.checkout().await?;

        match self.exchange(&pooled, message_bytes, timeout).await {
            Ok(bytes) => {
                self.pool.checkin(pooled);
                Ok(TransportResponse {
                    bytes,
                    protocol_used: "UDP",
                })
            }
            Err(e) => {
                self.pool.discard(pooled);
                Err(e)
            }
        }
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
