use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Failed to connect to upstream: {0}")]
    Dial(String),

    #[error("Upstream exchange failed: {0}")]
    Upstream(String),

    #[error("Upstream query timeout")]
    UpstreamTimeout,

    #[error("Invalid base64url query: {0}")]
    Decode(String),

    #[error("No DNS query provided")]
    EmptyQuery,
}

impl DomainError {
    /// True for failures that happened while talking to the upstream resolver.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Dial(_) | Self::Upstream(_) | Self::UpstreamTimeout
        )
    }
}
