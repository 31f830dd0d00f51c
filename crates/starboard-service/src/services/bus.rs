//! Domain event bus
//!
//! In-process fan-out of `DomainEvent`s to any number of subscribers.

use tokio::sync::broadcast;
use tracing::trace;

use starboard_core::DomainEvent;

/// Broadcast bus for domain events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Default subscriber buffer
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; returns how many subscribers received it
    pub fn publish(&self, event: DomainEvent) -> usize {
        let event_type = event.event_type();
        // No subscribers is not an error
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!(event_type, delivered, "Domain event published");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
