//! Prometheus metrics endpoint

use axum::response::IntoResponse;
use std::sync::atomic::{AtomicU64, Ordering};

/// Service counters for Prometheus
#[derive(Default)]
pub struct Metrics {
    /// Total tickets issued
    pub tickets_issued_total: AtomicU64,
    /// Total tickets completed
    pub tickets_served_total: AtomicU64,
    /// Total tickets cancelled
    pub tickets_cancelled_total: AtomicU64,
    /// Active WebSocket connections
    ws_connections: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_issued(&self) {
        self.tickets_issued_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_served(&self) {
        self.tickets_served_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cancelled(&self) {
        self.tickets_cancelled_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ws_connections(&self) {
        self.ws_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec_ws_connections(&self) {
        self.ws_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tickets_issued_total: self.tickets_issued_total.load(Ordering::Relaxed),
            tickets_served_total: self.tickets_served_total.load(Ordering::Relaxed),
            tickets_cancelled_total: self.tickets_cancelled_total.load(Ordering::Relaxed),
            ws_connections: self.ws_connections.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug)]
pub struct MetricsSnapshot {
    pub tickets_issued_total: u64,
    pub tickets_served_total: u64,
    pub tickets_cancelled_total: u64,
    pub ws_connections: u64,
}

/// GET /metrics
pub async fn prometheus_metrics(
    axum::extract::State(state): axum::extract::State<crate::state::AppState>,
) -> impl IntoResponse {
    let snapshot = state.metrics.get_metrics();
    let waiting_depth = state.engine.waiting_depth() as u64;

    let output = format!(
        r#"# HELP queuedesk_tickets_issued_total Total number of tickets issued
# TYPE queuedesk_tickets_issued_total counter
queuedesk_tickets_issued_total {}

# HELP queuedesk_tickets_served_total Total number of tickets completed
# TYPE queuedesk_tickets_served_total counter
queuedesk_tickets_served_total {}

# HELP queuedesk_tickets_cancelled_total Total number of tickets cancelled
# TYPE queuedesk_tickets_cancelled_total counter
queuedesk_tickets_cancelled_total {}

# HELP queuedesk_waiting_depth Current number of tickets in the waiting sequence
# TYPE queuedesk_waiting_depth gauge
queuedesk_waiting_depth {}

# HELP queuedesk_websocket_connections Current number of active WebSocket connections
# TYPE queuedesk_websocket_connections gauge
queuedesk_websocket_connections {}

# HELP queuedesk_info Build information
# TYPE queuedesk_info gauge
queuedesk_info{{version="{}"}} 1
"#,
        snapshot.tickets_issued_total,
        snapshot.tickets_served_total,
        snapshot.tickets_cancelled_total,
        waiting_depth,
        snapshot.ws_connections,
        env!("CARGO_PKG_VERSION"),
    );

    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        output,
    )
}
