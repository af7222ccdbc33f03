use crate::{errors::ApiError, state::AppState, utils::decode_dns_param};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderValue},
    response::Response,
};
use ferrous_doh_domain::{DnsQuery, DomainError};
use serde::Deserialize;
use tracing::{debug, instrument};

const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

#[derive(Debug, Deserialize)]
pub struct DohGetParams {
    dns: Option<String>,
}

/// GET with `?dns=<base64url>`.
#[instrument(skip_all, name = "doh_get")]
pub async fn doh_get(
    State(state): State<AppState>,
    Query(params): Query<DohGetParams>,
) -> Result<Response, ApiError> {
    let encoded = params
        .dns
        .filter(|value| !value.is_empty())
        .ok_or(DomainError::EmptyQuery)?;

    let query = DnsQuery::from(decode_dns_param(&encoded)?);
    resolve(&state, query).await
}

/// POST with the raw wire-format query as the body.
#[instrument(skip_all, name = "doh_post")]
pub async fn doh_post(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    resolve(&state, DnsQuery::new(body)).await
}

async fn resolve(state: &AppState, query: DnsQuery) -> Result<Response, ApiError> {
    let response = state.handle_query.execute(query).await?;

    debug!(bytes = response.len(), "DoH response ready");

    let mut res = Response::new(axum::body::Body::from(response));
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(DNS_MESSAGE_CONTENT_TYPE),
    );
    Ok(res)
}
