//! Application state shared across handlers

use crate::broadcast::EventBroadcaster;
use crate::engine::{QueueConfig, QueueEngine};
use crate::routes::metrics::Metrics;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The queue state machine, sole owner of ticket mutation
    pub engine: Arc<QueueEngine>,
    /// Broadcast side of the push-notification channel
    pub events: EventBroadcaster,
    /// Service counters for the metrics endpoint
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state.
    ///
    /// # Arguments
    /// * `config` - Engine tuning (service minutes, first ticket number)
    /// * `broadcast_capacity` - Per-receiver capacity of the event channel
    pub fn new(config: QueueConfig, broadcast_capacity: usize) -> Self {
        let events = EventBroadcaster::new(broadcast_capacity);
        Self {
            engine: Arc::new(QueueEngine::new(config, events.clone())),
            events,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
