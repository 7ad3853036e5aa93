/// Battle rule constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Ideal distance (in tiles) an AI unit tries to keep from the nearest
    /// opposing unit after moving.
    pub ai_standoff_distance: f32,
}

impl BattleConfig {
    // ===== compile-time constants =====
    /// Maximum number of units a single side may deploy.
    pub const MAX_UNITS_PER_SIDE: usize = 32;

    /// Tolerance used when deciding that accumulated movement cost has reached
    /// the unit's budget exactly.
    pub const EXHAUSTION_EPSILON: f32 = 0.1;

    /// Damage at or above which a lethal attack also moves the attacker onto
    /// the defender's tile.
    pub const OVERRUN_THRESHOLD: f32 = 3.0;

    /// Flat damage added on top of the attacker's action points.
    pub const BASE_DAMAGE_BONUS: f32 = 1.0;

    /// Health value AI scoring treats as "full" when prioritizing wounded targets.
    pub const REFERENCE_HEALTH: f32 = 100.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_AI_STANDOFF_DISTANCE: f32 = 1.0;

    pub const fn new() -> Self {
        Self {
            ai_standoff_distance: Self::DEFAULT_AI_STANDOFF_DISTANCE,
        }
    }

    pub fn with_ai_standoff_distance(ai_standoff_distance: f32) -> Self {
        Self {
            ai_standoff_distance,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
