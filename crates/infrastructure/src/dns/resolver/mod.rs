//! Query resolution with per-key coalescing
//!
//! - **PendingKeyIndex**: one async lock per recently seen query key
//! - **CoalescingResolver**: cache → per-key lock → cache re-check → upstream → cache
//!
//! Concurrent identical queries serialize on the same lock. The first one
//! goes upstream, the others find its response in the cache once they get
//! the lock.

pub mod coalescing;
pub mod pending;

pub use coalescing::{CoalescingResolver, ResolverMetrics, ResolverMetricsSnapshot};
pub use pending::{PendingKey, PendingKeyIndex};
