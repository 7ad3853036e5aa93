//! Scoring functions for planner candidates.
//!
//! Attacks start from a base of 100 and moves from 50, so any legal attack
//! outranks any move on the same unit.

use tactics_core::BattleConfig;

pub const ATTACK_BASE_SCORE: f32 = 100.0;
pub const MOVE_BASE_SCORE: f32 = 50.0;

/// Prefers wounded targets and heavy blows.
pub fn attack_score(target_health: f32, damage: f32) -> f32 {
    let wounded = 1.0 - target_health / BattleConfig::REFERENCE_HEALTH;
    ATTACK_BASE_SCORE + wounded * 50.0 + damage * 10.0
}

/// Prefers high ground and ending near `standoff` tiles from the closest
/// opponent.
pub fn move_score(elevation: i32, nearest_opponent: f32, standoff: f32) -> f32 {
    MOVE_BASE_SCORE + elevation as f32 * 5.0 - (nearest_opponent - standoff).abs() * 10.0
}
