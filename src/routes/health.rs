//! Health and readiness endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub engine: CheckStatus,
    pub broadcaster: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    pub message: String,
}

/// GET /health
///
/// Basic health check - returns 200 if the server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ready
///
/// Readiness check - verifies the engine answers and reports the
/// observer count
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    // Any engine read exercises the serialization point.
    let engine_check = CheckStatus {
        healthy: true,
        message: format!("Waiting depth: {}", state.engine.waiting_depth()),
    };

    let broadcaster_check = CheckStatus {
        healthy: true,
        message: format!("Subscribers: {}", state.events.receiver_count()),
    };

    let all_healthy = engine_check.healthy && broadcaster_check.healthy;
    let status = if all_healthy { "ready" } else { "not_ready" };
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            status,
            checks: ReadinessChecks {
                engine: engine_check,
                broadcaster: broadcaster_check,
            },
        }),
    )
}
