//! Topic-based event bus implementation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::subscription::{Listener, ListenerRegistry, SubscriptionToken};
use super::types::{AiEvent, BattleEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Unit movement, combat and deaths
    Battle,
    /// Turn hand-over and planner preview
    Turn,
    /// Planner execution
    Ai,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Battle, Topic::Turn, Topic::Ai];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Battle(BattleEvent),
    Turn(TurnEvent),
    Ai(AiEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Battle(_) => Topic::Battle,
            Event::Turn(_) => Topic::Turn,
            Event::Ai(_) => Topic::Ai,
        }
    }
}

impl From<BattleEvent> for Event {
    fn from(event: BattleEvent) -> Self {
        Event::Battle(event)
    }
}

impl From<TurnEvent> for Event {
    fn from(event: TurnEvent) -> Self {
        Event::Turn(event)
    }
}

impl From<AiEvent> for Event {
    fn from(event: AiEvent) -> Self {
        Event::Ai(event)
    }
}

struct Channels {
    battle: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    ai: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Battle => &self.battle,
            Topic::Turn => &self.turn,
            Topic::Ai => &self.ai,
        }
    }
}

/// Topic-based event bus
///
/// Consumers either hold a broadcast receiver per topic (async front-ends)
/// or register a synchronous listener and keep the returned
/// [`SubscriptionToken`] to revoke it later.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
    listeners: Arc<Mutex<ListenerRegistry>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Channels {
            battle: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            ai: broadcast::channel(capacity).0,
        };

        Self {
            channels: Arc::new(channels),
            listeners: Arc::new(Mutex::new(ListenerRegistry::default())),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        // Listeners run outside the lock so they may unsubscribe themselves.
        let listeners = self.registry().snapshot(topic);
        for listener in listeners {
            listener(&event);
        }

        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", ?topic, "no receivers");
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    /// Registers a synchronous listener for `topic`.
    pub fn listen<F>(&self, topic: Topic, listener: F) -> SubscriptionToken
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        self.registry().insert(topic, listener)
    }

    /// Revokes a listener. Returns false if the token was already revoked.
    pub fn unlisten(&self, token: SubscriptionToken) -> bool {
        self.registry().remove(token)
    }

    pub fn listener_count(&self, topic: Topic) -> usize {
        self.registry().len(topic)
    }

    fn registry(&self) -> MutexGuard<'_, ListenerRegistry> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
