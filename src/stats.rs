//! Read-only statistics derived from the ticket store

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::TicketStatus;
use crate::store::TicketStore;

/// Aggregated counters for the current operating period.
///
/// Always recomputed from store contents on query; there are no
/// incremental counters that could drift from the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Tickets completed with a resolution timestamp within today (UTC)
    pub served_today: usize,
    /// Exact mean of recorded waiting minutes over completed tickets
    pub avg_wait_time: f64,
    /// Tickets currently in the waiting sequence
    pub waiting_clients: usize,
    /// Tickets resolved either way (completed + cancelled)
    pub total_transactions: usize,
    /// Exact mean rating over rated feedback records
    pub avg_rating: f64,
    /// Count of rated feedback records
    pub feedback_count: usize,
}

/// Compute the full snapshot for `store` as of `now`.
pub fn compute(store: &TicketStore, now: DateTime<Utc>) -> StatsSnapshot {
    let today = now.date_naive();

    let mut served_today = 0;
    let mut waiting_clients = 0;
    let mut total_transactions = 0;
    let mut wait_sum: i64 = 0;
    let mut wait_count = 0;

    for ticket in store.list() {
        match ticket.status {
            TicketStatus::Waiting => waiting_clients += 1,
            TicketStatus::Called => {}
            TicketStatus::Completed => {
                total_transactions += 1;
                if ticket.resolved_at.map(|t| t.date_naive()) == Some(today) {
                    served_today += 1;
                }
                if let Some(minutes) = ticket.waiting_minutes {
                    wait_sum += minutes;
                    wait_count += 1;
                }
            }
            TicketStatus::Cancelled => total_transactions += 1,
        }
    }

    let mut rating_sum: u64 = 0;
    let mut feedback_count = 0;
    for record in store.feedback() {
        if let Some(rating) = record.rating {
            rating_sum += u64::from(rating);
            feedback_count += 1;
        }
    }

    let avg_wait_time = if wait_count > 0 {
        wait_sum as f64 / wait_count as f64
    } else {
        0.0
    };
    let avg_rating = if feedback_count > 0 {
        rating_sum as f64 / feedback_count as f64
    } else {
        0.0
    };

    StatsSnapshot {
        served_today,
        avg_wait_time,
        waiting_clients,
        total_transactions,
        avg_rating,
        feedback_count,
    }
}
