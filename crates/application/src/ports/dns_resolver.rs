use async_trait::async_trait;
use bytes::Bytes;
use ferrous_doh_domain::{DnsQuery, DomainError};

/// Turns a raw DNS query into the raw upstream response.
///
/// Implementations own caching and coalescing. Errors are per query and
/// never poison shared state.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, query: &DnsQuery) -> Result<Bytes, DomainError>;
}
