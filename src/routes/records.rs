//! Resolved-ticket history endpoint

use axum::{extract::State, Json};

use crate::models::TicketRecord;
use crate::state::AppState;

/// GET /api/transactions
///
/// One row per resolved ticket, newest first: date, number, client label,
/// transaction type, waiting minutes, status. Enough to reconstruct the
/// stats view for the period.
pub async fn list(State(state): State<AppState>) -> Json<Vec<TicketRecord>> {
    Json(state.engine.records())
}
