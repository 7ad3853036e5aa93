use crate::state::Position;

/// Axis-aligned step direction on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::West,
        CardinalDirection::East,
        CardinalDirection::North,
        CardinalDirection::South,
    ];

    /// Unit offset: east is +x, north is +y.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::South => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }

    /// Resolves an offset to a direction. Zero offsets and true diagonals
    /// (both components non-zero) have no direction.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(CardinalDirection::East),
            (-1, 0) => Some(CardinalDirection::West),
            (0, 1) => Some(CardinalDirection::North),
            (0, -1) => Some(CardinalDirection::South),
            _ => None,
        }
    }

    pub fn between(from: Position, to: Position) -> Option<Self> {
        Self::from_delta(to.x - from.x, to.y - from.y)
    }

    /// Position reached after `steps` moves from `origin`.
    pub fn advance(self, origin: Position, steps: i32) -> Position {
        let (dx, dy) = self.delta();
        origin.offset(dx * steps, dy * steps)
    }
}
