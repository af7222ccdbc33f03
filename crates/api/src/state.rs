use ferrous_doh_application::use_cases::HandleDnsQueryUseCase;
use ferrous_doh_infrastructure::dns::cache::QueryCache;
use ferrous_doh_infrastructure::dns::resolver::{PendingKeyIndex, ResolverMetrics};
use ferrous_doh_infrastructure::dns::transport::UdpConnectionPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub handle_query: Arc<HandleDnsQueryUseCase>,
    pub cache: Arc<QueryCache>,
    pub pending: Arc<PendingKeyIndex>,
    pub resolver_metrics: Arc<ResolverMetrics>,
    pub pool: Arc<UdpConnectionPool>,
}
