pub mod dns_resolver;
pub mod expiring_store;

pub use dns_resolver::DnsResolver;
pub use expiring_store::ExpiringStore;
