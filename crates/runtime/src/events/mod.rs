//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need, either through broadcast receivers or through
//! token-revocable listeners.

mod bus;
mod subscription;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use subscription::{SubscriptionSet, SubscriptionToken};
pub use types::{AiEvent, BattleEvent, TurnEvent};
