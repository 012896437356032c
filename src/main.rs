//! QueueDesk - Single-counter service queue manager

mod broadcast;
mod engine;
mod error;
mod models;
mod routes;
mod state;
mod stats;
mod store;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::engine::QueueConfig;
use crate::routes::{feedback, health, metrics, queue, records, stats as stats_api, ws};
use crate::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "queue_desk=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration
    let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
        .parse()
        .expect("Invalid LISTEN_ADDR");

    let broadcast_capacity: usize = std::env::var("BROADCAST_CAPACITY")
        .unwrap_or_else(|_| "1024".to_string())
        .parse()
        .expect("Invalid BROADCAST_CAPACITY");

    let service_minutes: u32 = std::env::var("SERVICE_MINUTES")
        .unwrap_or_else(|_| "5".to_string())
        .parse()
        .expect("Invalid SERVICE_MINUTES");

    let first_ticket_number: u32 = std::env::var("FIRST_TICKET_NUMBER")
        .unwrap_or_else(|_| "1".to_string())
        .parse()
        .expect("Invalid FIRST_TICKET_NUMBER");

    // Create application state
    let state = AppState::new(
        QueueConfig {
            service_minutes_per_ticket: service_minutes,
            first_ticket_number,
        },
        broadcast_capacity,
    );

    // Build router
    let app = Router::new()
        // Health and metrics (probes + Prometheus)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::prometheus_metrics))
        // Queue lifecycle
        .route("/api/queue/current", get(queue::current_snapshot))
        .route("/api/queue/join", post(queue::join))
        .route("/api/queue/call-next", post(queue::call_next))
        .route("/api/queue/complete", post(queue::complete))
        .route("/api/queue/cancel", post(queue::cancel))
        .route("/api/queue/status/:number", get(queue::status))
        // Feedback
        .route("/api/feedback/submit", post(feedback::submit))
        .route("/api/feedback/skip", post(feedback::skip))
        .route("/api/feedback/all", get(feedback::list))
        // Resolved-ticket history
        .route("/api/transactions", get(records::list))
        // Statistics
        .route("/api/stats", get(stats_api::snapshot))
        // Administrative reset
        .route("/api/admin/reset", post(queue::reset))
        // WebSocket push
        .route("/api/ws", get(ws::ws_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    info!(
        "QueueDesk v{} starting on {}",
        env!("CARGO_PKG_VERSION"),
        listen_addr
    );
    info!("Service minutes per ticket: {}", service_minutes);
    info!("First ticket number: {}", first_ticket_number);
    info!("Broadcast capacity: {}", broadcast_capacity);

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
