use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

/// DoH endpoints plus health and stats.
///
/// Every path other than `/health` and `/stats` is a DoH endpoint, so
/// clients may use `/dns-query` or any other path.
pub fn create_doh_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .route("/", get(handlers::doh_get).post(handlers::doh_post))
        .route("/{*path}", get(handlers::doh_get).post(handlers::doh_post))
        .with_state(state)
}
