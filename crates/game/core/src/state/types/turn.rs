use std::collections::BTreeSet;

use super::{Side, UnitId};

/// Turn bookkeeping: whose turn it is and who already acted in it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub active_side: Side,
    /// Completed rounds; a round ends when play returns to the player side.
    pub round: u32,
    exhausted: BTreeSet<UnitId>,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            active_side: Side::Player,
            round: 0,
            exhausted: BTreeSet::new(),
        }
    }

    pub fn exhausted(&self) -> &BTreeSet<UnitId> {
        &self.exhausted
    }

    pub fn exhausted_count(&self) -> usize {
        self.exhausted.len()
    }

    pub fn is_exhausted(&self, unit: UnitId) -> bool {
        self.exhausted.contains(&unit)
    }

    /// Returns false if the unit was already recorded.
    pub fn mark_exhausted(&mut self, unit: UnitId) -> bool {
        self.exhausted.insert(unit)
    }

    pub fn unmark_exhausted(&mut self, unit: UnitId) -> bool {
        self.exhausted.remove(&unit)
    }

    /// Hands the turn to `side` with an empty exhausted set.
    pub fn hand_over(&mut self, side: Side) {
        if side == Side::Player && self.active_side != Side::Player {
            self.round += 1;
        }
        self.active_side = side;
        self.exhausted.clear();
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
