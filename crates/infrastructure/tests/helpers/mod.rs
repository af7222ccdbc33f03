pub mod upstream_mock;

pub use upstream_mock::{Behavior, MockUpstream, CANNED_RESPONSE};
