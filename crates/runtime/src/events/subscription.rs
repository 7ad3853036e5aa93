//! Token-based listener registry.

use std::collections::HashMap;
use std::sync::Arc;

use super::bus::{Event, EventBus, Topic};

pub(crate) type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Handle returned by [`EventBus::listen`]; pass it to
/// [`EventBus::unlisten`] to stop receiving events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    topic: Topic,
    id: u64,
}

impl SubscriptionToken {
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: HashMap<Topic, Vec<(u64, Listener)>>,
}

impl ListenerRegistry {
    pub(crate) fn insert(&mut self, topic: Topic, listener: Listener) -> SubscriptionToken {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.entry(topic).or_default().push((id, listener));
        SubscriptionToken { topic, id }
    }

    pub(crate) fn remove(&mut self, token: SubscriptionToken) -> bool {
        let Some(entries) = self.listeners.get_mut(&token.topic) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(id, _)| *id != token.id);
        entries.len() != before
    }

    pub(crate) fn snapshot(&self, topic: Topic) -> Vec<Listener> {
        self.listeners
            .get(&topic)
            .map(|entries| entries.iter().map(|(_, listener)| Arc::clone(listener)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn len(&self, topic: Topic) -> usize {
        self.listeners.get(&topic).map_or(0, Vec::len)
    }
}

/// Listeners owned by one consumer, revoked together when the set is dropped.
pub struct SubscriptionSet {
    bus: EventBus,
    tokens: Vec<SubscriptionToken>,
}

impl SubscriptionSet {
    pub fn new(bus: &EventBus) -> Self {
        Self {
            bus: bus.clone(),
            tokens: Vec::new(),
        }
    }

    pub fn listen<F>(&mut self, topic: Topic, listener: F) -> SubscriptionToken
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let token = self.bus.listen(topic, listener);
        self.tokens.push(token);
        token
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Revokes every listener registered through this set.
    pub fn clear(&mut self) {
        for token in self.tokens.drain(..) {
            self.bus.unlisten(token);
        }
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.clear();
    }
}
