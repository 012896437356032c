//! Core domain models for the service queue

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// In the waiting sequence, not yet called
    Waiting,
    /// Being served at the counter right now
    Called,
    /// Served to completion
    Completed,
    /// Withdrawn before or during service
    Cancelled,
}

impl TicketStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// waiting → called, waiting → cancelled, called → completed,
    /// called → cancelled. Terminal states have no exits.
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Waiting, TicketStatus::Called)
                | (TicketStatus::Waiting, TicketStatus::Cancelled)
                | (TicketStatus::Called, TicketStatus::Completed)
                | (TicketStatus::Called, TicketStatus::Cancelled)
        )
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Completed | TicketStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Called => "called",
            TicketStatus::Completed => "completed",
            TicketStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One client's queued request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Sequential number, unique within the operating period
    pub number: u32,
    /// Category code, fixed at creation
    pub purpose: String,
    /// Human-readable category label, fixed at creation
    pub purpose_text: String,
    /// Identifying label for the ticket holder, fixed at creation
    pub client_label: String,
    /// Current lifecycle status
    pub status: TicketStatus,
    /// When the ticket joined the queue
    pub joined_at: DateTime<Utc>,
    /// When the ticket was called to the counter
    pub called_at: Option<DateTime<Utc>>,
    /// When the ticket reached a terminal status
    pub resolved_at: Option<DateTime<Utc>>,
    /// Wait duration in whole minutes, finalized at resolution
    pub waiting_minutes: Option<i64>,
}

/// Post-service feedback attached to a completed ticket.
///
/// `rating` is `None` for a skipped record, which still consumes the
/// one-per-ticket slot but is excluded from rating statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub ticket_number: u32,
    pub rating: Option<u8>,
    pub comment: String,
    /// Transaction type label, copied from the ticket at submission
    pub purpose_text: String,
    pub submitted_at: DateTime<Utc>,
}

impl Feedback {
    /// Whether this record carries a rating (i.e. was not skipped).
    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }
}

/// One row of the resolved-ticket history view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub date: NaiveDate,
    pub queue_number: u32,
    pub client_label: String,
    pub transaction_type: String,
    pub waiting_minutes: i64,
    pub status: TicketStatus,
}

impl TicketRecord {
    /// Build the history row for a resolved ticket.
    ///
    /// Returns `None` while the ticket is still live (no `resolved_at`).
    pub fn from_ticket(ticket: &Ticket) -> Option<Self> {
        let resolved_at = ticket.resolved_at?;
        Some(Self {
            date: resolved_at.date_naive(),
            queue_number: ticket.number,
            client_label: ticket.client_label.clone(),
            transaction_type: ticket.purpose_text.clone(),
            waiting_minutes: ticket.waiting_minutes.unwrap_or(0),
            status: ticket.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_matrix() {
        use TicketStatus::*;

        assert!(Waiting.can_transition_to(Called));
        assert!(Waiting.can_transition_to(Cancelled));
        assert!(Called.can_transition_to(Completed));
        assert!(Called.can_transition_to(Cancelled));

        assert!(!Waiting.can_transition_to(Completed));
        assert!(!Called.can_transition_to(Waiting));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Waiting));
        assert!(!Completed.can_transition_to(Completed));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TicketStatus::Waiting.is_terminal());
        assert!(!TicketStatus::Called.is_terminal());
        assert!(TicketStatus::Completed.is_terminal());
        assert!(TicketStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TicketStatus::Waiting).unwrap();
        assert_eq!(json, "\"waiting\"");
    }
}
