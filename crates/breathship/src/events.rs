//! Refresh signals between content consumers.
//!
//! One [`RefreshBus`] is created at the application root and cloned into
//! every resolver. After an admin edit the editing resolver publishes an
//! event and every other subscriber re-resolves on its own schedule.

use tokio::sync::broadcast;
use tracing::trace;

/// Default number of undelivered events a subscriber may fall behind by.
pub const DEFAULT_CAPACITY: usize = 64;

/// Something changed in the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshEvent {
    /// One content field received a new value.
    ContentUpdated {
        /// Field name.
        field: String,
        /// New value.
        value: String,
    },
    /// Many fields changed at once (snapshot import).
    ContentReplaced,
}

/// Broadcast channel for [`RefreshEvent`]s.
#[derive(Debug, Clone)]
pub struct RefreshBus {
    sender: broadcast::Sender<RefreshEvent>,
}

impl RefreshBus {
    /// Create a bus that buffers up to `capacity` events per subscriber.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns how many subscribers will see it.
    ///
    /// Publishing with nobody listening is not an error.
    pub fn publish(&self, event: RefreshEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => {
                trace!("Refresh event delivered to {} subscribers", receivers);
                receivers
            }
            Err(_) => 0,
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = RefreshBus::default();
        assert_eq!(bus.publish(RefreshEvent::ContentReplaced), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let bus = RefreshBus::new(4);
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let event = RefreshEvent::ContentUpdated {
            field: "hero_text".to_string(),
            value: "New headline".to_string(),
        };
        assert_eq!(bus.publish(event.clone()), 2);
        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let bus = RefreshBus::new(0);
        let mut rx = bus.subscribe();
        bus.publish(RefreshEvent::ContentReplaced);
        assert_eq!(rx.try_recv().unwrap(), RefreshEvent::ContentReplaced);
    }

    #[test]
    fn test_dropped_subscriber_not_counted() {
        let bus = RefreshBus::default();
        let rx = bus.subscribe();
        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
