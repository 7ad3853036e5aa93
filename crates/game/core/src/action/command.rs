use crate::error::{ErrorSeverity, GameError};
use crate::state::{BattleState, Position, UnitId};

use super::{AttackCommand, AttackError, MoveCommand, MoveError};

/// One-shot, reversible battle command.
///
/// Validation is side-effect free; `execute` re-validates and refuses to
/// mutate state when the command is illegal.
pub trait Command {
    type Plan;
    type Error: GameError;

    /// Unit performing the command.
    fn actor(&self) -> UnitId;

    /// Checks the command against the current state and resolves how it
    /// would play out.
    fn validate(&self, state: &BattleState) -> Result<Self::Plan, Self::Error>;

    fn can_execute(&self, state: &BattleState) -> bool {
        self.validate(state).is_ok()
    }

    /// Applies the command. Returns the unit that died as a direct result.
    fn execute(&mut self, state: &mut BattleState) -> Result<Option<UnitId>, Self::Error>;

    /// Best-effort reversal of a previous `execute`.
    fn undo(&mut self, state: &mut BattleState) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    Move,
    Attack,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Attack(#[from] AttackError),
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CommandError::Move(err) => err.severity(),
            CommandError::Attack(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CommandError::Move(err) => err.error_code(),
            CommandError::Attack(err) => err.error_code(),
        }
    }
}

/// Either command, for callers that handle both uniformly.
#[derive(Clone, Debug, PartialEq)]
pub enum BattleCommand {
    Move(MoveCommand),
    Attack(AttackCommand),
}

impl BattleCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            BattleCommand::Move(_) => CommandKind::Move,
            BattleCommand::Attack(_) => CommandKind::Attack,
        }
    }

    pub fn actor(&self) -> UnitId {
        match self {
            BattleCommand::Move(command) => command.actor(),
            BattleCommand::Attack(command) => command.actor(),
        }
    }

    pub fn destination(&self) -> Position {
        match self {
            BattleCommand::Move(command) => command.destination(),
            BattleCommand::Attack(command) => command.target(),
        }
    }

    pub fn validate(&self, state: &BattleState) -> Result<(), CommandError> {
        match self {
            BattleCommand::Move(command) => command.validate(state).map(|_| ())?,
            BattleCommand::Attack(command) => command.validate(state).map(|_| ())?,
        }
        Ok(())
    }

    pub fn can_execute(&self, state: &BattleState) -> bool {
        self.validate(state).is_ok()
    }

    pub fn execute(&mut self, state: &mut BattleState) -> Result<Option<UnitId>, CommandError> {
        Ok(match self {
            BattleCommand::Move(command) => command.execute(state)?,
            BattleCommand::Attack(command) => command.execute(state)?,
        })
    }

    pub fn undo(&mut self, state: &mut BattleState) -> Result<(), CommandError> {
        match self {
            BattleCommand::Move(command) => command.undo(state)?,
            BattleCommand::Attack(command) => command.undo(state)?,
        }
        Ok(())
    }
}

impl From<MoveCommand> for BattleCommand {
    fn from(command: MoveCommand) -> Self {
        BattleCommand::Move(command)
    }
}

impl From<AttackCommand> for BattleCommand {
    fn from(command: AttackCommand) -> Self {
        BattleCommand::Attack(command)
    }
}
