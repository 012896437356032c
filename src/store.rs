//! In-memory ticket store, the source of truth for one operating period

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::{Feedback, Ticket, TicketStatus};

/// Period-scoped store of every ticket and feedback record.
///
/// Numbers are assigned sequentially with no gaps and never reused within
/// a period. The store is a plain single-threaded structure; the queue
/// engine owns the serialization around it.
pub struct TicketStore {
    tickets: BTreeMap<u32, Ticket>,
    feedback: BTreeMap<u32, Feedback>,
    next_number: u32,
    first_number: u32,
}

impl TicketStore {
    /// Create an empty store whose first ticket will get `first_number`.
    pub fn new(first_number: u32) -> Self {
        Self {
            tickets: BTreeMap::new(),
            feedback: BTreeMap::new(),
            next_number: first_number,
            first_number,
        }
    }

    /// Create a ticket in `waiting` with the next sequential number.
    ///
    /// A missing client label defaults to `Client_<number>`. Fails only on
    /// an empty purpose code.
    pub fn create(
        &mut self,
        purpose: &str,
        purpose_text: &str,
        client_label: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&Ticket> {
        if purpose.trim().is_empty() {
            return Err(AppError::InvalidInput("purpose must not be empty".into()));
        }

        let number = self.next_number;
        self.next_number += 1;

        let client_label = match client_label {
            Some(label) if !label.trim().is_empty() => label.to_string(),
            _ => format!("Client_{}", number),
        };

        let ticket = Ticket {
            number,
            purpose: purpose.to_string(),
            purpose_text: purpose_text.to_string(),
            client_label,
            status: TicketStatus::Waiting,
            joined_at: now,
            called_at: None,
            resolved_at: None,
            waiting_minutes: None,
        };

        Ok(self.tickets.entry(number).or_insert(ticket))
    }

    pub fn get(&self, number: u32) -> Option<&Ticket> {
        self.tickets.get(&number)
    }

    /// All tickets in insertion (= number) order.
    pub fn list(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values()
    }

    /// Apply a lifecycle transition, stamping the timestamps that belong
    /// to it.
    ///
    /// `called_at` is set on entering `called`; `resolved_at` and
    /// `waiting_minutes` on entering a terminal status. Rejects unknown
    /// numbers and transitions outside the state machine, leaving the
    /// ticket untouched.
    pub fn transition(
        &mut self,
        number: u32,
        next: TicketStatus,
        now: DateTime<Utc>,
    ) -> Result<&Ticket> {
        let ticket = self
            .tickets
            .get_mut(&number)
            .ok_or(AppError::NotFound(number))?;

        if !ticket.status.can_transition_to(next) {
            return Err(AppError::InvalidState {
                number,
                status: ticket.status,
            });
        }

        ticket.status = next;
        match next {
            TicketStatus::Called => ticket.called_at = Some(now),
            TicketStatus::Completed | TicketStatus::Cancelled => {
                ticket.resolved_at = Some(now);
                ticket.waiting_minutes = Some((now - ticket.joined_at).num_minutes());
            }
            TicketStatus::Waiting => {}
        }

        Ok(ticket)
    }

    /// Attach the single feedback record a completed ticket may carry.
    ///
    /// `rating: None` records a skip. Fails on unknown numbers, on tickets
    /// not yet completed, and on a second submission.
    pub fn attach_feedback(
        &mut self,
        number: u32,
        rating: Option<u8>,
        comment: String,
        now: DateTime<Utc>,
    ) -> Result<&Feedback> {
        let ticket = self.tickets.get(&number).ok_or(AppError::NotFound(number))?;

        if ticket.status != TicketStatus::Completed {
            return Err(AppError::InvalidState {
                number,
                status: ticket.status,
            });
        }
        if self.feedback.contains_key(&number) {
            return Err(AppError::AlreadySubmitted(number));
        }

        let record = Feedback {
            ticket_number: number,
            rating,
            comment,
            purpose_text: ticket.purpose_text.clone(),
            submitted_at: now,
        };

        Ok(self.feedback.entry(number).or_insert(record))
    }

    pub fn feedback_for(&self, number: u32) -> Option<&Feedback> {
        self.feedback.get(&number)
    }

    /// All feedback records in submission (= ticket number) order.
    pub fn feedback(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback.values()
    }

    /// Clear all tickets and feedback and restart numbering.
    ///
    /// Administrative period reset only.
    pub fn reset(&mut self) {
        self.tickets.clear();
        self.feedback.clear();
        self.next_number = self.first_number;
    }

    /// The number the next created ticket will receive.
    pub fn next_number(&self) -> u32 {
        self.next_number
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store() -> TicketStore {
        TicketStore::new(1)
    }

    #[test]
    fn test_numbers_are_sequential_and_gapless() {
        let mut store = store();
        let now = Utc::now();

        for expected in 1..=5 {
            let ticket = store
                .create("enroll", "Enrollment", None, now)
                .unwrap()
                .clone();
            assert_eq!(ticket.number, expected);
        }
        assert_eq!(store.next_number(), 6);
    }

    #[test]
    fn test_empty_purpose_rejected() {
        let mut store = store();
        let err = store.create("  ", "Blank", None, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        // The failed create must not consume a number.
        assert_eq!(store.next_number(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_default_client_label() {
        let mut store = store();
        let ticket = store
            .create("pay", "Payment", None, Utc::now())
            .unwrap()
            .clone();
        assert_eq!(ticket.client_label, "Client_1");

        let ticket = store
            .create("pay", "Payment", Some("Alex R."), Utc::now())
            .unwrap()
            .clone();
        assert_eq!(ticket.client_label, "Alex R.");
    }

    #[test]
    fn test_transition_stamps_timestamps() {
        let mut store = store();
        let joined = Utc::now();
        store.create("docs", "Documents", None, joined).unwrap();

        let called = joined + Duration::minutes(3);
        let ticket = store
            .transition(1, TicketStatus::Called, called)
            .unwrap()
            .clone();
        assert_eq!(ticket.called_at, Some(called));
        assert_eq!(ticket.resolved_at, None);

        let resolved = joined + Duration::minutes(10);
        let ticket = store
            .transition(1, TicketStatus::Completed, resolved)
            .unwrap()
            .clone();
        assert_eq!(ticket.resolved_at, Some(resolved));
        assert_eq!(ticket.waiting_minutes, Some(10));
    }

    #[test]
    fn test_invalid_transition_leaves_ticket_unchanged() {
        let mut store = store();
        let now = Utc::now();
        store.create("docs", "Documents", None, now).unwrap();

        let err = store
            .transition(1, TicketStatus::Completed, now)
            .unwrap_err();
        assert_eq!(
            err,
            AppError::InvalidState {
                number: 1,
                status: TicketStatus::Waiting
            }
        );

        let ticket = store.get(1).unwrap();
        assert_eq!(ticket.status, TicketStatus::Waiting);
        assert_eq!(ticket.resolved_at, None);
    }

    #[test]
    fn test_transition_unknown_number() {
        let mut store = store();
        let err = store
            .transition(42, TicketStatus::Called, Utc::now())
            .unwrap_err();
        assert_eq!(err, AppError::NotFound(42));
    }

    #[test]
    fn test_feedback_requires_completed() {
        let mut store = store();
        let now = Utc::now();
        store.create("docs", "Documents", None, now).unwrap();

        let err = store
            .attach_feedback(1, Some(5), String::new(), now)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState { .. }));
    }

    #[test]
    fn test_feedback_attaches_once() {
        let mut store = store();
        let now = Utc::now();
        store.create("docs", "Documents", None, now).unwrap();
        store.transition(1, TicketStatus::Called, now).unwrap();
        store.transition(1, TicketStatus::Completed, now).unwrap();

        store
            .attach_feedback(1, Some(4), "quick".into(), now)
            .unwrap();
        let err = store
            .attach_feedback(1, Some(1), "changed my mind".into(), now)
            .unwrap_err();
        assert_eq!(err, AppError::AlreadySubmitted(1));

        // First record untouched by the rejected second attempt.
        let record = store.feedback_for(1).unwrap();
        assert_eq!(record.rating, Some(4));
        assert_eq!(record.comment, "quick");
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut store = TicketStore::new(100);
        let now = Utc::now();
        store.create("docs", "Documents", None, now).unwrap();
        store.create("docs", "Documents", None, now).unwrap();
        assert_eq!(store.next_number(), 102);

        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.next_number(), 100);

        let ticket = store.create("docs", "Documents", None, now).unwrap();
        assert_eq!(ticket.number, 100);
    }
}
