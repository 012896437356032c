//! Queue engine: ordered waiting sequence, single current ticket, and the
//! serialization point for every mutation

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;

use crate::broadcast::{EventBroadcaster, QueueEvent};
use crate::error::{AppError, Result};
use crate::models::{Feedback, Ticket, TicketRecord, TicketStatus};
use crate::stats::{self, StatsSnapshot};
use crate::store::TicketStore;

/// Engine tuning knobs, read from the environment at startup.
#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    /// Fixed per-ticket service time used for wait estimates
    pub service_minutes_per_ticket: u32,
    /// Number assigned to the first ticket of a period
    pub first_ticket_number: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            service_minutes_per_ticket: 5,
            first_ticket_number: 1,
        }
    }
}

/// Result of a successful join.
///
/// `position` and `estimated_wait_minutes` are point-in-time values;
/// later reads go through [`QueueEngine::status_of`], which recomputes
/// against the live sequence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    pub queue_number: u32,
    pub position: usize,
    pub estimated_wait_minutes: u32,
}

/// Live view of one ticket, as returned to a polling client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketProgress {
    pub status: TicketStatus,
    /// 1-indexed rank in the waiting sequence; only while waiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Estimated minutes until called; only while waiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_minutes: Option<u32>,
}

/// Display fields for one ticket in the snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    pub number: u32,
    pub purpose_text: String,
    pub client_label: String,
}

impl From<&Ticket> for TicketSummary {
    fn from(ticket: &Ticket) -> Self {
        Self {
            number: ticket.number,
            purpose_text: ticket.purpose_text.clone(),
            client_label: ticket.client_label.clone(),
        }
    }
}

/// Derived view of the whole queue: the current ticket, the FIFO waiting
/// sequence, and the next number to be issued.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub current: Option<TicketSummary>,
    pub waiting: Vec<TicketSummary>,
    pub next_number: u32,
}

struct EngineInner {
    store: TicketStore,
    /// Ticket numbers in join order; the position authority
    waiting: VecDeque<u32>,
    /// Number of the single `called` ticket, if any
    current: Option<u32>,
}

/// The queue state machine.
///
/// All operations take `&self` and serialize through one mutex, so two
/// concurrent `call_next` calls cannot both observe an empty current slot
/// and two joins cannot share a number. Each operation is atomic
/// commit-or-fail; a failed operation leaves state unchanged. One event is
/// published per successful mutation, while the lock is held, so observers
/// see events in mutation order.
pub struct QueueEngine {
    inner: Mutex<EngineInner>,
    events: EventBroadcaster,
    config: QueueConfig,
}

impl QueueEngine {
    pub fn new(config: QueueConfig, events: EventBroadcaster) -> Self {
        Self {
            inner: Mutex::new(EngineInner {
                store: TicketStore::new(config.first_ticket_number),
                waiting: VecDeque::new(),
                current: None,
            }),
            events,
            config,
        }
    }

    /// Create a ticket and append it to the tail of the waiting sequence.
    ///
    /// There is no limit on queue depth.
    pub fn join(
        &self,
        purpose: &str,
        purpose_text: &str,
        client_label: Option<&str>,
    ) -> Result<JoinOutcome> {
        let mut inner = self.inner.lock();
        let now = Utc::now();

        let number = inner
            .store
            .create(purpose, purpose_text, client_label, now)?
            .number;
        inner.waiting.push_back(number);

        let position = inner.waiting.len();
        self.events.publish(QueueEvent::TicketJoined { number });

        Ok(JoinOutcome {
            queue_number: number,
            position,
            estimated_wait_minutes: position as u32 * self.config.service_minutes_per_ticket,
        })
    }

    /// Call the waiting ticket that joined earliest.
    ///
    /// Fails with `AlreadyServing` while a ticket is at the counter and
    /// with `QueueEmpty` when nobody is waiting.
    pub fn call_next(&self) -> Result<Ticket> {
        let mut inner = self.inner.lock();

        if let Some(current) = inner.current {
            return Err(AppError::AlreadyServing(current));
        }
        let number = inner.waiting.pop_front().ok_or(AppError::QueueEmpty)?;

        let ticket = inner
            .store
            .transition(number, TicketStatus::Called, Utc::now())?
            .clone();
        inner.current = Some(number);

        self.events.publish(QueueEvent::TicketCalled { number });
        Ok(ticket)
    }

    /// Finish serving the current ticket.
    pub fn complete(&self, number: u32) -> Result<Ticket> {
        let mut inner = self.inner.lock();

        if inner.current != Some(number) {
            return Err(AppError::NotCurrentTicket(number));
        }
        let ticket = inner
            .store
            .transition(number, TicketStatus::Completed, Utc::now())?
            .clone();
        inner.current = None;

        self.events.publish(QueueEvent::TicketCompleted { number });
        Ok(ticket)
    }

    /// Withdraw a ticket, from the waiting sequence or from the counter.
    pub fn cancel(&self, number: u32) -> Result<Ticket> {
        let mut inner = self.inner.lock();

        let status = inner
            .store
            .get(number)
            .ok_or(AppError::NotFound(number))?
            .status;

        match status {
            TicketStatus::Waiting => {
                inner.waiting.retain(|&n| n != number);
            }
            TicketStatus::Called => {
                if inner.current != Some(number) {
                    return Err(AppError::NotCurrentTicket(number));
                }
                inner.current = None;
            }
            _ => {
                return Err(AppError::InvalidState { number, status });
            }
        }

        let ticket = inner
            .store
            .transition(number, TicketStatus::Cancelled, Utc::now())?
            .clone();

        self.events.publish(QueueEvent::TicketCancelled { number });
        Ok(ticket)
    }

    /// Live status of one ticket.
    ///
    /// For a waiting ticket the position and wait estimate are recomputed
    /// against the present sequence, so they reflect completions and
    /// cancellations ahead of it. Idempotent and safe to poll repeatedly.
    pub fn status_of(&self, number: u32) -> Result<TicketProgress> {
        let inner = self.inner.lock();

        let status = inner
            .store
            .get(number)
            .ok_or(AppError::NotFound(number))?
            .status;

        let position = match status {
            TicketStatus::Waiting => inner.waiting.iter().position(|&n| n == number).map(|i| i + 1),
            _ => None,
        };
        let wait_minutes =
            position.map(|p| p as u32 * self.config.service_minutes_per_ticket);

        Ok(TicketProgress {
            status,
            position,
            wait_minutes,
        })
    }

    /// Point-in-time view of the whole queue.
    pub fn current_snapshot(&self) -> QueueSnapshot {
        let inner = self.inner.lock();

        let current = inner
            .current
            .and_then(|n| inner.store.get(n))
            .map(TicketSummary::from);
        let waiting = inner
            .waiting
            .iter()
            .filter_map(|&n| inner.store.get(n))
            .map(TicketSummary::from)
            .collect();

        QueueSnapshot {
            current,
            waiting,
            next_number: inner.store.next_number(),
        }
    }

    /// Period statistics, recomputed from store contents.
    pub fn stats(&self) -> StatsSnapshot {
        let inner = self.inner.lock();
        stats::compute(&inner.store, Utc::now())
    }

    /// Attach a 1–5 rating (and optional comment) to a completed ticket.
    pub fn submit_feedback(&self, number: u32, rating: u8, comment: Option<String>) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }

        let mut inner = self.inner.lock();
        inner.store.attach_feedback(
            number,
            Some(rating),
            comment.unwrap_or_default(),
            Utc::now(),
        )?;

        self.events.publish(QueueEvent::FeedbackSubmitted { number });
        Ok(())
    }

    /// Decline to rate a completed ticket.
    ///
    /// Consumes the one-per-ticket feedback slot so a later submission is
    /// rejected, but records no rating and is not a lifecycle event.
    pub fn skip_feedback(&self, number: u32) -> Result<()> {
        let mut inner = self.inner.lock();
        inner
            .store
            .attach_feedback(number, None, String::new(), Utc::now())?;
        Ok(())
    }

    /// Rated feedback records, newest first.
    pub fn feedback_list(&self) -> Vec<Feedback> {
        let inner = self.inner.lock();
        let mut records: Vec<Feedback> = inner
            .store
            .feedback()
            .filter(|f| f.is_rated())
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then(b.ticket_number.cmp(&a.ticket_number))
        });
        records
    }

    /// History rows for every resolved ticket, newest first.
    pub fn records(&self) -> Vec<TicketRecord> {
        let inner = self.inner.lock();
        let mut resolved: Vec<(chrono::DateTime<Utc>, TicketRecord)> = inner
            .store
            .list()
            .filter_map(|t| Some((t.resolved_at?, TicketRecord::from_ticket(t)?)))
            .collect();
        resolved.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.queue_number.cmp(&a.1.queue_number)));
        resolved.into_iter().map(|(_, r)| r).collect()
    }

    /// Administrative period reset: clears every ticket and feedback
    /// record and restarts numbering.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.store.reset();
        inner.waiting.clear();
        inner.current = None;

        self.events.publish(QueueEvent::QueueReset);
    }

    /// Depth of the waiting sequence right now.
    pub fn waiting_depth(&self) -> usize {
        self.inner.lock().waiting.len()
    }
}
