//! Bounded undo/redo history of component commands

use crate::command::ComponentCommand;
use crate::EditorError;
use noco_core::ComponentsController;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 64;

pub struct UndoHistory {
    done: VecDeque<ComponentCommand>,
    undone: Vec<ComponentCommand>,
    limit: usize,
}

impl UndoHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Execute `command` and record it. Clears the redo stack.
    pub fn perform(
        &mut self,
        mut command: ComponentCommand,
        components: &mut ComponentsController,
    ) -> Result<(), EditorError> {
        command.execute(components)?;
        self.undone.clear();
        self.done.push_back(command);
        if self.done.len() > self.limit {
            // Oldest capture expires with its command.
            self.done.pop_front();
        }
        Ok(())
    }

    pub fn undo(&mut self, components: &mut ComponentsController) -> Result<&str, EditorError> {
        let mut command = self.done.pop_back().ok_or(EditorError::NothingToUndo)?;
        if let Err(err) = command.undo(components) {
            self.done.push_back(command);
            return Err(err);
        }
        self.undone.push(command);
        Ok(self.undone.last().map(ComponentCommand::label).unwrap_or_default())
    }

    pub fn redo(&mut self, components: &mut ComponentsController) -> Result<&str, EditorError> {
        let mut command = self.undone.pop().ok_or(EditorError::NothingToRedo)?;
        if let Err(err) = command.execute(components) {
            self.undone.push(command);
            return Err(err);
        }
        self.done.push_back(command);
        Ok(self.done.back().map(ComponentCommand::label).unwrap_or_default())
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
