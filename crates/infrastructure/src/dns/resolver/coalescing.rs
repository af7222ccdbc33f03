use crate::dns::cache::QueryCache;
use crate::dns::resolver::pending::PendingKeyIndex;
use crate::dns::transport::DnsTransport;
use async_trait::async_trait;
use bytes::Bytes;
use ferrous_doh_application::ports::DnsResolver;
use ferrous_doh_domain::{DnsQuery, DomainError};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Default)]
pub struct ResolverMetrics {
    pub upstream_queries: AtomicU64,
    pub upstream_failures: AtomicU64,
    pub coalesced_hits: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolverMetricsSnapshot {
    pub upstream_queries: u64,
    pub upstream_failures: u64,
    pub coalesced_hits: u64,
}

impl ResolverMetrics {
    pub fn snapshot(&self) -> ResolverMetricsSnapshot {
        ResolverMetricsSnapshot {
            upstream_queries: self.upstream_queries.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            coalesced_hits: self.coalesced_hits.load(Ordering::Relaxed),
        }
    }
}

/// Cache-first resolver that sends at most one upstream query per key at a
/// time.
///
/// Concurrent callers with the same query bytes serialize on that key's
/// pending lock. The first one forwards upstream and fills the cache, the
/// rest find the cached answer once they get the lock. Callers with
/// different keys never wait on each other.
pub struct CoalescingResolver {
    cache: Arc<QueryCache>,
    pending: Arc<PendingKeyIndex>,
    transport: Arc<dyn DnsTransport>,
    cache_ttl: Duration,
    query_timeout: Duration,
    metrics: Arc<ResolverMetrics>,
}

impl CoalescingResolver {
    pub fn new(
        cache: Arc<QueryCache>,
        pending: Arc<PendingKeyIndex>,
        transport: Arc<dyn DnsTransport>,
        cache_ttl: Duration,
        query_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            pending,
            transport,
            cache_ttl,
            query_timeout,
            metrics: Arc::new(ResolverMetrics::default()),
        }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn pending(&self) -> &Arc<PendingKeyIndex> {
        &self.pending
    }

    pub fn metrics(&self) -> Arc<ResolverMetrics> {
        Arc::clone(&self.metrics)
    }

    async fn forward(&self, query: &DnsQuery) -> Result<Bytes, DomainError> {
        self.metrics.upstream_queries.fetch_add(1, Ordering::Relaxed);

        let response = self
            .transport
            .send(query.as_bytes(), self.query_timeout)
            .await
            .inspect_err(|e| {
                self.metrics.upstream_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    error = %e,
                    protocol = self.transport.protocol_name(),
                    "Upstream query failed"
                );
            })?;

        if !self.cache_ttl.is_zero() {
            self.cache
                .insert(query.key().clone(), response.bytes.clone(), self.cache_ttl);
        }

        debug!(
            bytes = response.bytes.len(),
            protocol = response.protocol_used,
            "Upstream response cached"
        );

        Ok(response.bytes)
    }
}

#[async_trait]
impl DnsResolver for CoalescingResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<Bytes, DomainError> {
        if let Some(cached) = self.cache.get(query.as_bytes()) {
            return Ok(cached);
        }

        let pending = self.pending.acquire(query.key());
        let _guard = pending.lock().await;

        // Another caller may have filled the cache while we waited.
        if let Some(cached) = self.cache.peek(query.as_bytes()) {
            self.metrics.coalesced_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }

        self.forward(query).await
    }
}
