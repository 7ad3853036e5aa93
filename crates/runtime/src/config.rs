//! Runtime configuration.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use tactics_core::{BattleConfig, Side};

/// Runtime configuration shared by the session and its providers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pause before each planner-driven command.
    pub ai_action_delay: Duration,
    pub event_buffer_size: usize,
    /// Side driven by the tactical planner during its own turns.
    pub ai_side: Side,
    /// Let the planner drive the other side as well (demo and soak runs).
    pub autoplay_player: bool,
    pub battle: BattleConfig,
}

impl RuntimeConfig {
    pub const DEFAULT_AI_ACTION_DELAY: Duration = Duration::from_millis(500);
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

    /// Loads overrides from `TACTICS_*` environment variables.
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("TACTICS_AI_DELAY_MS") {
            config.ai_action_delay = Duration::from_millis(millis);
        }
        if let Some(size) = read_env::<usize>("TACTICS_EVENT_BUFFER") {
            config.event_buffer_size = size.max(1);
        }
        if let Some(side) = read_env::<Side>("TACTICS_AI_SIDE") {
            config.ai_side = side;
        }
        if let Some(autoplay) = read_env::<bool>("TACTICS_AUTOPLAY") {
            config.autoplay_player = autoplay;
        }
        if let Some(distance) = read_env::<f32>("TACTICS_AI_STANDOFF") {
            config.battle.ai_standoff_distance = distance;
        }

        config
    }

    #[must_use]
    pub fn with_ai_action_delay(mut self, delay: Duration) -> Self {
        self.ai_action_delay = delay;
        self
    }

    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay_player = autoplay;
        self
    }

    /// Side whose turns are fed by an [`crate::IntentProvider`].
    pub fn manual_side(&self) -> Side {
        self.ai_side.opponent()
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ai_action_delay: Self::DEFAULT_AI_ACTION_DELAY,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
            ai_side: Side::Enemy,
            autoplay_player: false,
            battle: BattleConfig::default(),
        }
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}
