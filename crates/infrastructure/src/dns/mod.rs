pub mod cache;
pub mod resolver;
pub mod transport;

pub use cache::{CacheMetrics, QueryCache};
pub use resolver::{CoalescingResolver, PendingKeyIndex, ResolverMetrics};
pub use transport::{DnsTransport, TransportResponse, UdpConnectionPool, UdpTransport};
