// Query cache keyed by exact wire bytes

pub mod compaction;
pub mod metrics;
pub mod storage;

pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use storage::QueryCache;
