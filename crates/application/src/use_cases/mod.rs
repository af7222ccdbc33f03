pub mod maintenance;
pub mod queries;

pub use maintenance::SweepExpiredEntriesUseCase;
pub use queries::HandleDnsQueryUseCase;
