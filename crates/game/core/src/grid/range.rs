use tracing::trace;

use crate::env::{MapOracle, StaticTile};
use crate::state::Position;

use super::CardinalDirection;

/// In-band marker for a step that cannot be taken.
pub const BLOCKED_COST: f32 = f32::INFINITY;

/// One entry of a directional range walk.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeStep {
    pub position: Position,
    pub tile: StaticTile,
    /// Cost of entering this tile from the previous entry (0 for the origin).
    pub cost: f32,
}

impl RangeStep {
    pub fn is_blocked(&self) -> bool {
        self.cost.is_infinite()
    }
}

/// Ordered tiles along one cardinal direction, origin first.
///
/// Built once per query and never mutated. When the walk hit impassable
/// ground the last entry carries [`BLOCKED_COST`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRange {
    direction: CardinalDirection,
    steps: Vec<RangeStep>,
}

impl TileRange {
    pub fn direction(&self) -> CardinalDirection {
        self.direction
    }

    /// `None` only for an empty range, which [`compute_range`] never builds.
    pub fn origin(&self) -> Option<Position> {
        self.steps.first().map(|step| step.position)
    }

    pub fn steps(&self) -> &[RangeStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// First `count + 1` entries: the origin plus `count` steps.
    pub fn trimmed(&self, count: u32) -> &[RangeStep] {
        let end = (count as usize + 1).min(self.steps.len());
        &self.steps[..end]
    }

    pub fn costs(&self) -> impl Iterator<Item = f32> + '_ {
        self.steps.iter().map(|step| step.cost)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.steps.iter().map(|step| step.position)
    }

    #[cfg(test)]
    pub(crate) fn empty(direction: CardinalDirection) -> Self {
        Self {
            direction,
            steps: Vec::new(),
        }
    }

    /// True if the walk ended on an impassable step.
    pub fn is_terminated(&self) -> bool {
        self.steps.last().is_some_and(RangeStep::is_blocked)
    }
}

/// Movement cost of stepping from elevation `from` onto elevation `to`.
///
/// Returns the cost and whether the step breaks the walker's legs (a drop of
/// more than two levels: free, but no further step is possible).
pub fn step_cost(from: i32, to: i32) -> (f32, bool) {
    let drop = from - to;
    match drop {
        0 => (1.0, false),
        -1 => (2.0, false),
        d if d < -1 => (BLOCKED_COST, false),
        1 | 2 => (1.0 / (1.0 + drop as f32), false),
        _ => (0.0, true),
    }
}

/// Walks from `origin` toward `direction` while the accumulated cost stays
/// within `budget`.
///
/// The origin is always included, and so is the entry that first pushes the
/// total over `budget`.
/// Returns `None` if the origin or any visited coordinate lies outside the
/// grid: the whole query fails rather than being truncated.
pub fn compute_range<M>(
    map: &M,
    origin: Position,
    direction: CardinalDirection,
    budget: f32,
) -> Option<TileRange>
where
    M: MapOracle + ?Sized,
{
    let mut steps: Vec<RangeStep> = Vec::new();
    let mut accumulated = 0.0_f32;
    let mut legs_broken = false;
    let mut index = 0;

    loop {
        let position = direction.advance(origin, index);
        let tile = map.tile(position)?;

        let cost = match steps.last() {
            None => 0.0,
            Some(_) if !tile.is_traversable() || legs_broken => BLOCKED_COST,
            Some(previous) => {
                let (cost, broke) = step_cost(previous.tile.elevation, tile.elevation);
                legs_broken = broke;
                cost
            }
        };

        steps.push(RangeStep {
            position,
            tile,
            cost,
        });
        if cost.is_infinite() {
            break;
        }

        accumulated += cost;
        if accumulated > budget {
            break;
        }
        index += 1;
    }

    trace!(
        target: "core::grid",
        %origin,
        %direction,
        budget,
        len = steps.len(),
        "range computed"
    );

    Some(TileRange { direction, steps })
}

/// Range query between two arbitrary cells, budgeted by their distance.
///
/// Returns `None` for zero-distance or diagonal queries and for anything
/// [`compute_range`] rejects.
pub fn collect_range<M>(map: &M, start: Position, target: Position) -> Option<TileRange>
where
    M: MapOracle + ?Sized,
{
    let steps = start.step_distance(target);
    if steps == 0 {
        return None;
    }
    let direction = CardinalDirection::between(start, target)?;
    compute_range(map, start, direction, steps as f32)
}
