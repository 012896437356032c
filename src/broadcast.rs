//! Best-effort fan-out of queue lifecycle events to connected observers

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::TicketStatus;

/// A lifecycle change notification.
///
/// Carries the ticket number and the transition that produced it, enough
/// for an observer to decide relevance. Observers re-fetch full state for
/// display; the push is a signal, not the payload of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QueueEvent {
    TicketJoined { number: u32 },
    TicketCalled { number: u32 },
    TicketCompleted { number: u32 },
    TicketCancelled { number: u32 },
    FeedbackSubmitted { number: u32 },
    QueueReset,
}

impl QueueEvent {
    /// The ticket status this event announces, if it concerns one ticket.
    pub fn new_status(&self) -> Option<TicketStatus> {
        match self {
            QueueEvent::TicketJoined { .. } => Some(TicketStatus::Waiting),
            QueueEvent::TicketCalled { .. } => Some(TicketStatus::Called),
            QueueEvent::TicketCompleted { .. } | QueueEvent::FeedbackSubmitted { .. } => {
                Some(TicketStatus::Completed)
            }
            QueueEvent::TicketCancelled { .. } => Some(TicketStatus::Cancelled),
            QueueEvent::QueueReset => None,
        }
    }
}

/// Observer registration and publishing over a tokio broadcast channel.
///
/// Delivery is best-effort: publishing with no subscribers is not an
/// error, and a lagging receiver drops the oldest events. Observers poll
/// on an interval as the consistency fallback, so missed notifications
/// self-heal.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<QueueEvent>,
}

impl EventBroadcaster {
    /// Create a broadcaster whose channel buffers up to `capacity` events
    /// per receiver before lagging.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register an observer.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to every current subscriber.
    ///
    /// Returns the number of subscribers the event reached.
    pub fn publish(&self, event: QueueEvent) -> usize {
        // Send errors only mean nobody is listening right now.
        self.tx.send(event).unwrap_or(0)
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let events = EventBroadcaster::new(16);
        assert_eq!(events.publish(QueueEvent::QueueReset), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let events = EventBroadcaster::new(16);
        let mut rx_a = events.subscribe();
        let mut rx_b = events.subscribe();

        let reached = events.publish(QueueEvent::TicketCalled { number: 7 });
        assert_eq!(reached, 2);

        assert_eq!(
            rx_a.recv().await.unwrap(),
            QueueEvent::TicketCalled { number: 7 }
        );
        assert_eq!(
            rx_b.recv().await.unwrap(),
            QueueEvent::TicketCalled { number: 7 }
        );
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let events = EventBroadcaster::new(16);
        let mut rx = events.subscribe();

        events.publish(QueueEvent::TicketJoined { number: 1 });
        events.publish(QueueEvent::TicketCalled { number: 1 });
        events.publish(QueueEvent::TicketCompleted { number: 1 });

        assert_eq!(rx.recv().await.unwrap(), QueueEvent::TicketJoined { number: 1 });
        assert_eq!(rx.recv().await.unwrap(), QueueEvent::TicketCalled { number: 1 });
        assert_eq!(
            rx.recv().await.unwrap(),
            QueueEvent::TicketCompleted { number: 1 }
        );
    }

    #[test]
    fn test_event_wire_form() {
        let json = serde_json::to_string(&QueueEvent::TicketCalled { number: 5 }).unwrap();
        assert_eq!(json, r#"{"event":"ticket_called","number":5}"#);

        let json = serde_json::to_string(&QueueEvent::QueueReset).unwrap();
        assert_eq!(json, r#"{"event":"queue_reset"}"#);
    }

    #[test]
    fn test_new_status_mapping() {
        assert_eq!(
            QueueEvent::TicketJoined { number: 1 }.new_status(),
            Some(TicketStatus::Waiting)
        );
        assert_eq!(QueueEvent::QueueReset.new_status(), None);
    }
}
