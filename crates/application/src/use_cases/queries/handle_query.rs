use crate::ports::DnsResolver;
use bytes::Bytes;
use ferrous_doh_domain::{DnsQuery, DomainError};
use std::sync::Arc;
use tracing::{debug, error};

/// Entry point for the HTTP façade: raw query bytes in, raw response bytes out.
pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(&self, query: DnsQuery) -> Result<Bytes, DomainError> {
        if query.is_empty() {
            return Err(DomainError::EmptyQuery);
        }

        debug!(query_len = query.len(), "Handling DNS query");

        self.resolver.resolve(&query).await.inspect_err(|e| {
            error!(error = %e, "Failed to send DNS query");
        })
    }
}
