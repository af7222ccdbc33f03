use anyhow::Context;
use ferrous_doh_api::AppState;
use ferrous_doh_application::ports::ExpiringStore;
use ferrous_doh_application::use_cases::{HandleDnsQueryUseCase, SweepExpiredEntriesUseCase};
use ferrous_doh_domain::Config;
use ferrous_doh_infrastructure::dns::{
    CoalescingResolver, PendingKeyIndex, QueryCache, ResolverMetrics, UdpConnectionPool,
    UdpTransport,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Every long-lived service, built once at startup.
pub struct DnsServices {
    pub cache: Arc<QueryCache>,
    pub pending: Arc<PendingKeyIndex>,
    pub pool: Arc<UdpConnectionPool>,
    pub resolver_metrics: Arc<ResolverMetrics>,
    pub handle_query: Arc<HandleDnsQueryUseCase>,
    pub sweep: Arc<SweepExpiredEntriesUseCase>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let upstream = resolve_upstream(&config.upstream.address).await?;

        let cache = Arc::new(QueryCache::new());
        let pending = Arc::new(PendingKeyIndex::new(Duration::from_secs(
            config.cache.pending_ttl_secs,
        )));
        let pool = Arc::new(UdpConnectionPool::new(
            upstream,
            config.upstream.max_idle_connections,
        ));

        let resolver = Arc::new(CoalescingResolver::new(
            Arc::clone(&cache),
            Arc::clone(&pending),
            Arc::new(UdpTransport::new(Arc::clone(&pool))),
            Duration::from_secs(config.cache.ttl_secs),
            Duration::from_millis(config.upstream.timeout_ms),
        ));
        let resolver_metrics = resolver.metrics();

        let cache_store: Arc<dyn ExpiringStore> = cache.clone();
        let pending_store: Arc<dyn ExpiringStore> = pending.clone();
        let sweep = Arc::new(SweepExpiredEntriesUseCase::new(vec![
            cache_store,
            pending_store,
        ]));

        info!(
            upstream = %upstream,
            max_idle = config.upstream.max_idle_connections,
            timeout_ms = config.upstream.timeout_ms,
            "DNS services initialized"
        );

        Ok(Self {
            cache,
            pending,
            pool,
            resolver_metrics,
            handle_query: Arc::new(HandleDnsQueryUseCase::new(resolver)),
            sweep,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            handle_query: Arc::clone(&self.handle_query),
            cache: Arc::clone(&self.cache),
            pending: Arc::clone(&self.pending),
            resolver_metrics: Arc::clone(&self.resolver_metrics),
            pool: Arc::clone(&self.pool),
        }
    }
}

/// Resolve the upstream `host:port` once. The pool keeps this address.
async fn resolve_upstream(address: &str) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host(address)
        .await
        .with_context(|| format!("Failed to resolve upstream address '{}'", address))?
        .next()
        .with_context(|| format!("Upstream address '{}' resolved to nothing", address))
}
