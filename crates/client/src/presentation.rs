//! Plain-text rendering of the board and of bus events.

use std::fmt::Write as _;

use tactics_core::{BattleState, GridMap, MapOracle, Position, Side, TerrainKind};
use tactics_runtime::{AiEvent, BattleEvent, Event, TurnEvent};

/// Draws the board with `y` growing upwards.
///
/// Units show as `P`/`E` (lowercase once exhausted); terrain as `#` wall,
/// `~` water, a digit for raised ground, `.` otherwise.
pub fn render_board(state: &BattleState, map: &GridMap) -> String {
    let dimensions = map.dimensions();
    let mut out = String::new();

    for y in (0..dimensions.height as i32).rev() {
        let _ = write!(out, "{y:>2} ");
        for x in 0..dimensions.width as i32 {
            let position = Position::new(x, y);
            out.push(cell(state, map, position));
        }
        out.push('\n');
    }
    out.push_str("   ");
    for x in 0..dimensions.width {
        out.push(char::from_digit(x % 10, 10).unwrap_or('?'));
    }
    out
}

fn cell(state: &BattleState, map: &GridMap, position: Position) -> char {
    if let Some(unit) = state.unit_at(position) {
        let glyph = match unit.side {
            Side::Player => 'P',
            Side::Enemy => 'E',
        };
        return if unit.exhausted {
            glyph.to_ascii_lowercase()
        } else {
            glyph
        };
    }
    match map.tile(position) {
        Some(tile) if tile.blocking => '#',
        Some(tile) if tile.terrain == TerrainKind::Water => '~',
        Some(tile) if (1..10).contains(&tile.elevation) => {
            char::from_digit(tile.elevation as u32, 10).unwrap_or('^')
        }
        Some(tile) if tile.elevation >= 10 => '^',
        Some(_) => '.',
        None => ' ',
    }
}

pub fn describe(event: &Event) -> String {
    match event {
        Event::Battle(event) => match event {
            BattleEvent::UnitMoved { unit, from, to } => format!("{unit} moves {from} -> {to}"),
            BattleEvent::UnitAttacked {
                attacker,
                defender,
                damage,
                ..
            } => format!("{attacker} strikes {defender} for {damage:.1}"),
            BattleEvent::UnitDied { unit, side } => format!("{unit} ({side}) falls"),
            BattleEvent::UnitExhausted { unit } => format!("{unit} is spent"),
            BattleEvent::BattleEnded { loser } => format!("battle over, {loser} side lost"),
        },
        Event::Turn(event) => match event {
            TurnEvent::TurnStarted { side, round } => format!("== {side} turn, round {round} =="),
            TurnEvent::UnitSkipped { unit } => format!("{unit} holds position"),
            TurnEvent::CommandUndone { kind } => format!("{kind} undone"),
            TurnEvent::PreviewUpdated { actions } => {
                let mut line = String::from("enemy intends:");
                for action in actions {
                    let _ = write!(line, " {} {} {};", action.unit, action.kind, action.destination);
                }
                line
            }
            TurnEvent::PreviewCleared => "enemy intentions cleared".to_string(),
            TurnEvent::PreviewWithdrawn { unit } => format!("{unit} will not act"),
        },
        Event::Ai(event) => match event {
            AiEvent::ActionExecuted { action, fallback } => {
                let via = if *fallback { " (fallback)" } else { "" };
                format!("{} {}s {}{via}", action.unit, action.kind, action.destination)
            }
            AiEvent::ActionFailed { action } => format!("{} could not {}", action.unit, action.kind),
            AiEvent::NoLegalAction { unit } => format!("{unit} has nothing to do"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{StaticTile, UnitSpec};

    #[test]
    fn board_marks_units_and_terrain() {
        let map = GridMap::flat(3, 2)
            .with_tile(Position::new(1, 0), StaticTile::wall())
            .with_tile(Position::new(2, 1), StaticTile::water())
            .with_elevation(Position::new(0, 1), 2);
        let mut state = BattleState::new();
        let id = state
            .deploy(&map, UnitSpec::new("a", Side::Player, 2, 5.0), Position::new(2, 0))
            .unwrap();
        state.exhaust(id);

        assert_eq!(render_board(&state, &map), " 1 2.~\n 0 .#p\n   012");
    }
}
