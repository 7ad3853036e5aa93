//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scenario RON file to load.
    pub scenario: PathBuf,
    /// Stop after this many completed rounds.
    pub max_rounds: u32,
}

impl ClientConfig {
    pub const DEFAULT_MAX_ROUNDS: u32 = 20;

    pub fn from_env() -> Self {
        let scenario = env::var_os("TACTICS_SCENARIO")
            .map(PathBuf::from)
            .unwrap_or_else(default_scenario);
        let max_rounds = read_env("TACTICS_MAX_ROUNDS").unwrap_or(Self::DEFAULT_MAX_ROUNDS);

        Self {
            scenario,
            max_rounds,
        }
    }
}

fn default_scenario() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios/ridge.ron")
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_content::ScenarioLoader;
    use tactics_core::Side;

    #[test]
    fn bundled_scenario_deploys() {
        let scenario = ScenarioLoader::load(&default_scenario()).unwrap();
        let (state, _) = scenario.deploy().unwrap();

        assert_eq!(state.active_count(Side::Player), 3);
        assert_eq!(state.active_count(Side::Enemy), 3);
    }
}
