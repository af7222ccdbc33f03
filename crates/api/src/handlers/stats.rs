use crate::{dto::StatsResponse, state::AppState};
use axum::{extract::State, Json};
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_stats")]
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = StatsResponse::collect(&state);

    debug!(
        cache_entries = stats.cache.entries,
        pending_keys = stats.pending_keys,
        idle_sockets = stats.pool.idle,
        "Stats retrieved"
    );

    Json(stats)
}
