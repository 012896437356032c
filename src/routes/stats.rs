//! Period statistics endpoint

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::stats::StatsSnapshot;

/// GET /api/stats
///
/// Counters recomputed from the ticket store on every call; nothing here
/// is cached or incremented out of band.
pub async fn snapshot(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.engine.stats())
}
