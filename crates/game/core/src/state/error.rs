//! State management errors.
//!
//! Errors related to the unit registry and placing units on the grid.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, Side, UnitId};

/// Errors raised by the unit registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistryError {
    #[error("unit name `{name}` is already in use")]
    DuplicateName { name: String },

    #[error("{side} roster is full (max: {max})")]
    RosterFull { side: Side, max: usize },

    #[error("unit {unit} is not on the battlefield")]
    UnknownUnit { unit: UnitId },

    #[error("unit id overflow")]
    IdOverflow,
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RegistryError::DuplicateName { .. }
            | RegistryError::RosterFull { .. }
            | RegistryError::UnknownUnit { .. } => ErrorSeverity::Validation,
            RegistryError::IdOverflow => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateName { .. } => "REGISTRY_DUPLICATE_NAME",
            RegistryError::RosterFull { .. } => "REGISTRY_ROSTER_FULL",
            RegistryError::UnknownUnit { .. } => "REGISTRY_UNKNOWN_UNIT",
            RegistryError::IdOverflow => "REGISTRY_ID_OVERFLOW",
        }
    }
}

/// Errors raised when placing a unit at the start of a battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeploymentError {
    #[error("position {position} is out of bounds (map size: {width}x{height})")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    #[error("position {position} is not traversable")]
    NotTraversable { position: Position },

    #[error("position {position} is already occupied by {occupant}")]
    Occupied { position: Position, occupant: UnitId },

    #[error("position {position} is not a {side} spawn point")]
    NotSpawnPoint { position: Position, side: Side },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl GameError for DeploymentError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            DeploymentError::Registry(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DeploymentError::OutOfBounds { .. } => "DEPLOY_OUT_OF_BOUNDS",
            DeploymentError::NotTraversable { .. } => "DEPLOY_NOT_TRAVERSABLE",
            DeploymentError::Occupied { .. } => "DEPLOY_OCCUPIED",
            DeploymentError::NotSpawnPoint { .. } => "DEPLOY_NOT_SPAWN_POINT",
            DeploymentError::Registry(err) => err.error_code(),
        }
    }
}
