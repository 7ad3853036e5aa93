//! Runtime orchestration for tactical battles.
//!
//! This crate wires the deterministic rules of `tactics-core` into a playable
//! battle: a [`BattleSession`] runs the turn state machine, the tactical
//! planner drives the computer side, and every change is published on the
//! topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the turn state machine and planner-turn execution
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`providers`] holds the tactical planner and planner-backed intents
//! - [`config`] loads runtime tunables
pub mod api;
pub mod config;
pub mod events;
pub mod providers;
pub mod session;

pub use api::{Intent, IntentProvider, Result, RuntimeError, ScriptedIntentProvider};
pub use config::RuntimeConfig;
pub use events::{
    AiEvent, BattleEvent, Event, EventBus, SubscriptionSet, SubscriptionToken, Topic, TurnEvent,
};
pub use providers::{AiAction, PlannerIntentProvider, SidePlan, TacticalPlanner};
pub use session::{AiActionOutcome, AiResolution, BattleSession, PlannerTurn};
