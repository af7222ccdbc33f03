use crate::state::AppState;
use ferrous_doh_infrastructure::dns::cache::CacheMetricsSnapshot;
use ferrous_doh_infrastructure::dns::resolver::ResolverMetricsSnapshot;
use ferrous_doh_infrastructure::dns::transport::PoolStatsSnapshot;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    #[serde(flatten)]
    pub metrics: CacheMetricsSnapshot,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStats,
    pub resolver: ResolverMetricsSnapshot,
    pub pool: PoolStatsSnapshot,
    pub pending_keys: usize,
}

impl StatsResponse {
    pub fn collect(state: &AppState) -> Self {
        Self {
            cache: CacheStats {
                entries: state.cache.len(),
                metrics: state.cache.metrics().snapshot(),
            },
            resolver: state.resolver_metrics.snapshot(),
            pool: state.pool.stats(),
            pending_keys: state.pending.len(),
        }
    }
}
