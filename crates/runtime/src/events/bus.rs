//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::Event;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Queued, animated and resolved actions
    Combat,
    /// Readiness meters and turn readiness
    Turn,
    /// Menu and target focus changes
    Selection,
    /// Battle won or lost
    Outcome,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Combat, Topic::Turn, Topic::Selection, Topic::Outcome];

    const fn index(self) -> usize {
        match self {
            Topic::Combat => 0,
            Topic::Turn => 1,
            Topic::Selection => 2,
            Topic::Outcome => 3,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels for every topic are created up front,
/// so publishing and subscribing never lock.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL.map(|_| broadcast::channel(capacity).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{BattleEvent, CombatantId, Tick};

    use super::*;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut outcome = bus.subscribe(Topic::Outcome);
        let mut turn = bus.subscribe(Topic::Turn);

        bus.publish(Event::new(Tick(3), BattleEvent::TurnReady {
            combatant: CombatantId(1),
        }));
        bus.publish(Event::new(Tick(4), BattleEvent::BattleWon));

        let received = outcome.recv().await.unwrap();
        assert_eq!(received.tick, Tick(4));
        assert_eq!(received.event, BattleEvent::BattleWon);
        assert!(outcome.try_recv().is_err());

        let received = turn.recv().await.unwrap();
        assert_eq!(received.topic(), Topic::Turn);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(Event::new(Tick(1), BattleEvent::BattleLost));
    }
}
