use crate::state::{BattleState, UnitId};

use super::{BattleCommand, CommandError, CommandKind};

/// Undo/redo stacks of executed commands.
#[derive(Clone, Debug, Default)]
pub struct CommandHistory {
    done: Vec<BattleCommand>,
    undone: Vec<BattleCommand>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes `command` and records it. Failed commands are not recorded.
    pub fn execute(
        &mut self,
        mut command: BattleCommand,
        state: &mut BattleState,
    ) -> Result<Option<UnitId>, CommandError> {
        let fallen = command.execute(state)?;
        self.done.push(command);
        self.undone.clear();
        Ok(fallen)
    }

    /// Reverts the most recent command. Returns `None` when there is nothing
    /// to undo.
    pub fn undo(&mut self, state: &mut BattleState) -> Result<Option<CommandKind>, CommandError> {
        let Some(mut command) = self.done.pop() else {
            return Ok(None);
        };
        if let Err(err) = command.undo(state) {
            self.done.push(command);
            return Err(err);
        }
        let kind = command.kind();
        self.undone.push(command);
        Ok(Some(kind))
    }

    /// Re-executes the most recently undone command. The command is
    /// validated again and stays on the redo stack if it is no longer legal.
    pub fn redo(&mut self, state: &mut BattleState) -> Result<Option<CommandKind>, CommandError> {
        let Some(mut command) = self.undone.pop() else {
            return Ok(None);
        };
        if let Err(err) = command.execute(state) {
            self.undone.push(command);
            return Err(err);
        }
        let kind = command.kind();
        self.done.push(command);
        Ok(Some(kind))
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Forgets everything, e.g. when the turn passes to the other side.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
}
