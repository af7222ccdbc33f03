use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ferrous_doh_domain::DomainError;
use tracing::debug;

/// Maps resolution failures onto DoH status codes.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DomainError::EmptyQuery | DomainError::Decode(_) => StatusCode::BAD_REQUEST,
            DomainError::Dial(_) | DomainError::Upstream(_) | DomainError::UpstreamTimeout => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::BAD_REQUEST {
            debug!(error = %self.0, "Rejected DoH request");
            "No DNS query provided"
        } else {
            "Failed to send DNS query"
        };

        (status, message).into_response()
    }
}
