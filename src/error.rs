//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::TicketStatus;

/// Application error types.
///
/// Every kind is recoverable; a failed operation leaves engine state
/// unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Queue is empty")]
    QueueEmpty,

    #[error("Ticket {0} is already being served")]
    AlreadyServing(u32),

    #[error("Ticket {0} is not the ticket currently being served")]
    NotCurrentTicket(u32),

    #[error("Ticket {0} not found")]
    NotFound(u32),

    #[error("Ticket {number} cannot leave status '{status}'")]
    InvalidState { number: u32, status: TicketStatus },

    #[error("Feedback for ticket {0} was already submitted")]
    AlreadySubmitted(u32),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::QueueEmpty
            | AppError::AlreadyServing(_)
            | AppError::NotCurrentTicket(_)
            | AppError::InvalidState { .. }
            | AppError::AlreadySubmitted(_) => StatusCode::CONFLICT,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_ticket() {
        let err = AppError::NotCurrentTicket(7);
        assert!(err.to_string().contains('7'));

        let err = AppError::InvalidState {
            number: 3,
            status: TicketStatus::Completed,
        };
        assert!(err.to_string().contains("completed"));
    }
}
