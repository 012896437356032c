//! Queue lifecycle endpoints: join, call-next, complete, cancel, status

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{JoinOutcome, QueueSnapshot, TicketProgress, TicketSummary};
use crate::error::Result;
use crate::state::AppState;

/// Request body for joining the queue
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Category code, e.g. "enrollment"
    pub purpose: String,
    /// Human-readable category label shown on both front ends
    pub purpose_text: String,
    /// Optional label for the ticket holder
    pub client_label: Option<String>,
}

/// Request body for operations targeting one ticket
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketNumberRequest {
    pub queue_number: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallNextResponse {
    pub ticket: TicketSummary,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub success: bool,
}

fn ok() -> Json<OkResponse> {
    Json(OkResponse { success: true })
}

/// GET /api/queue/current
///
/// The full derived queue view: current ticket, waiting sequence, next
/// number. Served to both the operator console and the client view, on
/// poll and on push receipt alike.
pub async fn current_snapshot(State(state): State<AppState>) -> Json<QueueSnapshot> {
    Json(state.engine.current_snapshot())
}

/// POST /api/queue/join
///
/// Issues the next ticket number and appends the ticket to the waiting
/// sequence. The returned position and estimate are point-in-time values.
pub async fn join(
    State(state): State<AppState>,
    Json(payload): Json<JoinRequest>,
) -> Result<(StatusCode, Json<JoinOutcome>)> {
    let outcome = state.engine.join(
        &payload.purpose,
        &payload.purpose_text,
        payload.client_label.as_deref(),
    )?;

    state.metrics.inc_issued();
    info!(
        number = outcome.queue_number,
        position = outcome.position,
        purpose = %payload.purpose,
        "Ticket joined the queue"
    );

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /api/queue/call-next
///
/// Operator action: calls the earliest-joined waiting ticket to the
/// counter. Fails while another ticket is still being served.
pub async fn call_next(State(state): State<AppState>) -> Result<Json<CallNextResponse>> {
    let ticket = state.engine.call_next()?;

    info!(number = ticket.number, "Ticket called to the counter");
    Ok(Json(CallNextResponse {
        ticket: TicketSummary::from(&ticket),
    }))
}

/// POST /api/queue/complete
///
/// Operator action: finishes serving the current ticket.
pub async fn complete(
    State(state): State<AppState>,
    Json(payload): Json<TicketNumberRequest>,
) -> Result<Json<OkResponse>> {
    let ticket = state.engine.complete(payload.queue_number)?;

    state.metrics.inc_served();
    info!(
        number = ticket.number,
        waiting_minutes = ticket.waiting_minutes,
        "Ticket completed"
    );
    Ok(ok())
}

/// POST /api/queue/cancel
///
/// Withdraws a ticket, either from the waiting sequence or from the
/// counter.
pub async fn cancel(
    State(state): State<AppState>,
    Json(payload): Json<TicketNumberRequest>,
) -> Result<Json<OkResponse>> {
    let ticket = state.engine.cancel(payload.queue_number)?;

    state.metrics.inc_cancelled();
    info!(number = ticket.number, "Ticket cancelled");
    Ok(ok())
}

/// GET /api/queue/status/:number
///
/// Poll one ticket. For waiting tickets the position and wait estimate
/// are recomputed against the live sequence on every call.
pub async fn status(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<TicketProgress>> {
    Ok(Json(state.engine.status_of(number)?))
}

/// POST /api/admin/reset
///
/// Administrative period reset: drops every ticket and feedback record
/// and restarts numbering. Out of the normal client/operator flow.
pub async fn reset(State(state): State<AppState>) -> Json<OkResponse> {
    state.engine.reset();
    info!("Operating period reset");
    ok()
}
