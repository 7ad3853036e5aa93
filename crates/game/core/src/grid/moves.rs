use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::config::BattleConfig;
use crate::env::MapOracle;
use crate::state::{BattleState, Position, UnitState};

use super::{CardinalDirection, compute_range};

/// Tiles a unit can reach or strike this turn.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reachable {
    pub moves: BTreeSet<Position>,
    /// Enemy-held tiles mapped to the damage an attack would deal.
    pub attacks: BTreeMap<Position, f32>,
}

impl Reachable {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.attacks.is_empty()
    }

    pub fn can_move_to(&self, position: Position) -> bool {
        self.moves.contains(&position)
    }

    pub fn can_attack(&self, position: Position) -> bool {
        self.attacks.contains_key(&position)
    }
}

/// Legal destinations for `unit`, walking all four directions with its
/// action-point budget.
///
/// Per direction the walk stops at the first tile that is over budget,
/// impassable, or occupied. An enemy on that tile becomes an attack target.
/// A free tile that spends the budget to within
/// [`BattleConfig::EXHAUSTION_EPSILON`] is the last one taken, which keeps
/// this set in agreement with [`crate::MoveCommand`] validation.
pub fn legal_moves_for<M>(state: &BattleState, map: &M, unit: &UnitState) -> Reachable
where
    M: MapOracle + ?Sized,
{
    let budget = unit.action_points as f32;
    let mut reachable = Reachable::default();

    for direction in CardinalDirection::ALL {
        let Some(range) = compute_range(map, unit.position, direction, budget) else {
            continue;
        };

        let mut accumulated = 0.0_f32;
        for step in range.steps().iter().skip(1) {
            let before = accumulated;
            accumulated += step.cost;

            if accumulated > budget || !step.tile.is_traversable() {
                break;
            }

            if let Some(occupant) = state.unit_at(step.position) {
                if occupant.is_hostile_to(unit) {
                    let damage = budget + BattleConfig::BASE_DAMAGE_BONUS - before;
                    reachable.attacks.insert(step.position, damage);
                }
                break;
            }

            reachable.moves.insert(step.position);
            if (accumulated - budget).abs() < BattleConfig::EXHAUSTION_EPSILON {
                break;
            }
        }
    }

    trace!(
        target: "core::grid",
        unit = %unit.id,
        moves = reachable.moves.len(),
        attacks = reachable.attacks.len(),
        "legal moves computed"
    );

    reachable
}
