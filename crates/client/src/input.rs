//! Line-based command input for the manual side.
//!
//! ```text
//! move <unit> <x> <y>
//! attack <unit> <x> <y>
//! skip <unit>
//! undo
//! quit
//! ```

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use tactics_core::{BattleState, GridMap, Position, Side, UnitId};
use tactics_runtime::{Intent, IntentProvider, Result, RuntimeError};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("no unit named `{0}`")]
    UnknownUnit(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("`{0}` is not a coordinate")]
    BadCoordinate(String),
}

/// What a line of input asks for.
#[derive(Debug, PartialEq)]
pub enum Parsed {
    Intent(Intent),
    Quit,
    Blank,
}

pub fn parse_line(line: &str, state: &BattleState) -> std::result::Result<Parsed, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Parsed::Blank);
    };

    let intent = match command.to_ascii_lowercase().as_str() {
        "quit" | "q" => return Ok(Parsed::Quit),
        "undo" | "u" => Intent::Undo,
        "skip" | "s" => Intent::Skip {
            unit: unit_arg(&mut words, state)?,
        },
        "move" | "m" => {
            let unit = unit_arg(&mut words, state)?;
            Intent::movement(unit, position_arg(&mut words)?)
        }
        "attack" | "a" => {
            let unit = unit_arg(&mut words, state)?;
            Intent::attack(unit, position_arg(&mut words)?)
        }
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Parsed::Intent(intent))
}

fn unit_arg<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    state: &BattleState,
) -> std::result::Result<UnitId, InputError> {
    let name = words.next().ok_or(InputError::MissingArgument("unit name"))?;
    state
        .units
        .iter()
        .find(|unit| unit.name.eq_ignore_ascii_case(name))
        .map(|unit| unit.id)
        .ok_or_else(|| InputError::UnknownUnit(name.to_string()))
}

fn position_arg<'a>(
    words: &mut impl Iterator<Item = &'a str>,
) -> std::result::Result<Position, InputError> {
    let mut coordinate = || -> std::result::Result<i32, InputError> {
        let word = words.next().ok_or(InputError::MissingArgument("coordinate"))?;
        word.parse()
            .map_err(|_| InputError::BadCoordinate(word.to_string()))
    };
    let x = coordinate()?;
    let y = coordinate()?;
    Ok(Position::new(x, y))
}

/// Reads intents from standard input.
pub struct StdinIntentProvider {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinIntentProvider {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinIntentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentProvider for StdinIntentProvider {
    async fn next_intent(
        &self,
        side: Side,
        state: &BattleState,
        _map: &GridMap,
    ) -> Result<Option<Intent>> {
        let mut lines = self.lines.lock().await;
        loop {
            println!("{side}> ");
            let line = lines
                .next_line()
                .await
                .map_err(|err| RuntimeError::Provider {
                    reason: err.to_string(),
                })?;
            let Some(line) = line else {
                return Ok(None);
            };

            match parse_line(&line, state) {
                Ok(Parsed::Intent(intent)) => return Ok(Some(intent)),
                Ok(Parsed::Quit) => return Ok(None),
                Ok(Parsed::Blank) => {}
                Err(err) => println!("{err}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::UnitSpec;

    fn state() -> (BattleState, UnitId) {
        let map = GridMap::flat(4, 4);
        let mut state = BattleState::new();
        let id = state
            .deploy(&map, UnitSpec::new("Aldric", Side::Player, 2, 10.0), Position::ORIGIN)
            .unwrap();
        (state, id)
    }

    #[test]
    fn parses_commands_by_unit_name() {
        let (state, id) = state();

        assert_eq!(
            parse_line("move aldric 1 0", &state),
            Ok(Parsed::Intent(Intent::movement(id, Position::new(1, 0))))
        );
        assert_eq!(
            parse_line("a Aldric 2 0", &state),
            Ok(Parsed::Intent(Intent::attack(id, Position::new(2, 0))))
        );
        assert_eq!(
            parse_line("skip aldric", &state),
            Ok(Parsed::Intent(Intent::Skip { unit: id }))
        );
        assert_eq!(parse_line("   ", &state), Ok(Parsed::Blank));
        assert_eq!(parse_line("quit", &state), Ok(Parsed::Quit));
    }

    #[test]
    fn reports_bad_input() {
        let (state, _) = state();

        assert_eq!(
            parse_line("dance", &state),
            Err(InputError::UnknownCommand("dance".into()))
        );
        assert_eq!(
            parse_line("move Mira 1 0", &state),
            Err(InputError::UnknownUnit("Mira".into()))
        );
        assert_eq!(
            parse_line("move Aldric 1", &state),
            Err(InputError::MissingArgument("coordinate"))
        );
        assert_eq!(
            parse_line("move Aldric x 1", &state),
            Err(InputError::BadCoordinate("x".into()))
        );
    }
}
