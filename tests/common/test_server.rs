use ferrous_doh_api::{create_doh_routes, AppState};
use ferrous_doh_application::ports::ExpiringStore;
use ferrous_doh_application::use_cases::{HandleDnsQueryUseCase, SweepExpiredEntriesUseCase};
use ferrous_doh_infrastructure::dns::{
    CoalescingResolver, PendingKeyIndex, QueryCache, ResolverMetrics, UdpConnectionPool,
    UdpTransport,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Full proxy stack served over a real TCP listener on a random port.
pub struct TestServer {
    addr: SocketAddr,
    pub cache: Arc<QueryCache>,
    pub pending: Arc<PendingKeyIndex>,
    pub metrics: Arc<ResolverMetrics>,
    pub sweep: Arc<SweepExpiredEntriesUseCase>,
    shutdown: CancellationToken,
}

pub struct TestServerBuilder {
    upstream: SocketAddr,
    cache_ttl: Duration,
    timeout: Duration,
}

impl TestServerBuilder {
    pub fn new(upstream: SocketAddr) -> Self {
        Self {
            upstream,
            cache_ttl: Duration::from_secs(30),
            timeout: Duration::from_secs(2),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn build(self) -> std::io::Result<TestServer> {
        let cache = Arc::new(QueryCache::new());
        let pending = Arc::new(PendingKeyIndex::new(Duration::from_secs(10)));
        let pool = Arc::new(UdpConnectionPool::new(self.upstream, 16));
        let resolver = Arc::new(CoalescingResolver::new(
            Arc::clone(&cache),
            Arc::clone(&pending),
            Arc::new(UdpTransport::new(Arc::clone(&pool))),
            self.cache_ttl,
            self.timeout,
        ));
        let metrics = resolver.metrics();

        let cache_store: Arc<dyn ExpiringStore> = cache.clone();
        let pending_store: Arc<dyn ExpiringStore> = pending.clone();
        let sweep = Arc::new(SweepExpiredEntriesUseCase::new(vec![
            cache_store,
            pending_store,
        ]));

        let state = AppState {
            handle_query: Arc::new(HandleDnsQueryUseCase::new(resolver)),
            cache: Arc::clone(&cache),
            pending: Arc::clone(&pending),
            resolver_metrics: Arc::clone(&metrics),
            pool,
        };

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        tokio::spawn(async move {
            let _ = axum::serve(listener, create_doh_routes(state))
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await;
        });

        Ok(TestServer {
            addr,
            cache,
            pending,
            metrics,
            sweep,
            shutdown,
        })
    }
}

impl TestServer {
    pub async fn start(upstream: SocketAddr) -> std::io::Result<Self> {
        TestServerBuilder::new(upstream).build().await
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
