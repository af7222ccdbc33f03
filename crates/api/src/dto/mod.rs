pub mod stats;

pub use stats::{CacheStats, StatsResponse};
