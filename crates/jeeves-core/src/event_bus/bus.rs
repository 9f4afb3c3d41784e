use super::types::CoordinatorEvent;
use tokio::sync::broadcast;

/// Fan-out of registry and dispatch events.
///
/// The registry publishes agent lifecycle and state transitions; the
/// coordinator publishes the progress of each dispatch, tagged with its
/// `dispatch_id`. Publishing never waits on observers: a subscriber that
/// falls more than `capacity` events behind gets `RecvError::Lagged` and
/// resumes from the oldest retained event.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoordinatorEvent>,
}

impl EventBus {
    /// Bus retaining up to `capacity` undelivered events per subscriber.
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Observe coordinator activity from this point on. Earlier events are
    /// not replayed, so subscribe before registering agents to see their
    /// first `AgentStateChanged`.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.sender.subscribe()
    }

    /// Publish a coordinator event and return how many observers got it.
    ///
    /// Dispatch never depends on being observed, so an event with no
    /// subscribers is dropped and reported as zero.
    pub fn publish(&self, event: CoordinatorEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Number of live observers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    /// Same capacity as `CoordinatorConfig::default().event_capacity`
    fn default() -> Self {
        Self::new(256)
    }
}
