//! Node Components Editor
//!
//! Design-time editing of a node's component list. Every structural edit is
//! wrapped in a [`ComponentCommand`] that captures a snapshot first, so an
//! [`UndoHistory`] can revert it.

pub mod command;
pub mod history;
pub mod rows;

pub use command::{ComponentCommand, EditAction};
pub use history::UndoHistory;
pub use rows::{component_rows, ComponentRow};

use noco_core::ControllerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("command '{label}' was undone before it was done")]
    NotPerformed { label: String },
}
