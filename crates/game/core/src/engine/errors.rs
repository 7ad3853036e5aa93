//! Turn-level errors.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Side, UnitId};

/// Errors raised when a unit tries to act outside the turn rules.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("unit {unit} not found")]
    UnitNotFound { unit: UnitId },

    #[error("unit {unit} fights for {side} but it is {active}'s turn")]
    NotYourTurn {
        unit: UnitId,
        side: Side,
        active: Side,
    },

    #[error("unit {unit} has already acted this turn")]
    AlreadyExhausted { unit: UnitId },

    #[error("battle is over, {loser} lost")]
    BattleOver { loser: Side },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::AlreadyExhausted { .. } => ErrorSeverity::Recoverable,
            TurnError::UnitNotFound { .. }
            | TurnError::NotYourTurn { .. }
            | TurnError::BattleOver { .. } => ErrorSeverity::Validation,
            TurnError::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::UnitNotFound { .. } => "TURN_UNIT_NOT_FOUND",
            TurnError::NotYourTurn { .. } => "TURN_NOT_YOUR_TURN",
            TurnError::AlreadyExhausted { .. } => "TURN_ALREADY_EXHAUSTED",
            TurnError::BattleOver { .. } => "TURN_BATTLE_OVER",
            TurnError::Oracle(err) => err.error_code(),
        }
    }
}
