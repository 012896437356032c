//! Post-service feedback endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::models::Feedback;
use crate::routes::queue::OkResponse;
use crate::state::AppState;

/// Request body for submitting a rating
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub queue_number: u32,
    /// 1–5
    pub rating: u8,
    pub comment: Option<String>,
}

/// Request body for declining to rate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipFeedbackRequest {
    pub queue_number: u32,
}

/// POST /api/feedback/submit
///
/// Attaches the single 1–5 rating a completed ticket may carry.
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<Json<OkResponse>> {
    state
        .engine
        .submit_feedback(payload.queue_number, payload.rating, payload.comment)?;

    info!(
        number = payload.queue_number,
        rating = payload.rating,
        "Feedback submitted"
    );
    Ok(Json(OkResponse { success: true }))
}

/// POST /api/feedback/skip
///
/// Records a skip, consuming the ticket's one feedback slot without a
/// rating.
pub async fn skip(
    State(state): State<AppState>,
    Json(payload): Json<SkipFeedbackRequest>,
) -> Result<Json<OkResponse>> {
    state.engine.skip_feedback(payload.queue_number)?;
    Ok(Json(OkResponse { success: true }))
}

/// GET /api/feedback/all
///
/// Rated feedback records, newest first. Skipped records are omitted.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Feedback>> {
    Json(state.engine.feedback_list())
}
