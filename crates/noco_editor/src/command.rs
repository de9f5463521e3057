// command.rs - Reversible structural edits
//
// Do: capture snapshot, mutate, persist. Undo: restore capture, persist.

use crate::EditorError;
use noco_core::{ComponentsController, Snapshot};

/// One structural edit on a component list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Add { type_name: String },
    Remove { index: usize },
    MoveUp { index: usize },
    MoveDown { index: usize },
    Reset { index: usize },
}

impl EditAction {
    fn apply(&self, components: &mut ComponentsController) -> Result<(), EditorError> {
        match self {
            EditAction::Add { type_name } => {
                components.add_component_by_name(type_name)?;
            }
            EditAction::Remove { index } => components.remove_component_at(*index)?,
            EditAction::MoveUp { index } => {
                components.move_up_component(*index)?;
            }
            EditAction::MoveDown { index } => {
                components.move_down_component(*index)?;
            }
            EditAction::Reset { index } => components.reset_component(*index)?,
        }
        Ok(())
    }

    /// Menu-style label, e.g. "Add Component Player: Spinner".
    pub fn label(&self, node: &str) -> String {
        match self {
            EditAction::Add { type_name } => {
                let short = type_name.rsplit("::").next().unwrap_or(type_name);
                format!("Add Component {node}: {short}")
            }
            EditAction::Remove { index } => format!("Remove Component {node}: {index}"),
            EditAction::MoveUp { index } => format!("Move Up Component {node}: {index}"),
            EditAction::MoveDown { index } => format!("Move Down Component {node}: {index}"),
            EditAction::Reset { index } => format!("Reset Component {node}: {index}"),
        }
    }
}

/// An edit paired with the state captured right before it ran.
#[derive(Debug, Clone)]
pub struct ComponentCommand {
    label: String,
    action: EditAction,
    before: Option<Snapshot>,
}

impl ComponentCommand {
    pub fn new(node: &str, action: EditAction) -> Self {
        Self {
            label: action.label(node),
            action,
            before: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn action(&self) -> &EditAction {
        &self.action
    }

    /// Capture, mutate, persist. If the edit is rejected nothing is captured;
    /// if persisting fails the list is rolled back to the capture.
    pub fn execute(&mut self, components: &mut ComponentsController) -> Result<(), EditorError> {
        let before = components.get_snapshot();
        self.action.apply(components)?;
        if let Err(err) = components.apply_components() {
            if let Err(rollback) = components.restore_components_from_data(before.records()) {
                tracing::warn!(command = %self.label, error = %rollback, "rollback failed");
            }
            return Err(err.into());
        }
        self.before = Some(before);
        tracing::debug!(command = %self.label, "command done");
        Ok(())
    }

    /// Restore the capture and persist it.
    pub fn undo(&mut self, components: &mut ComponentsController) -> Result<(), EditorError> {
        let before = self.before.as_ref().ok_or_else(|| EditorError::NotPerformed {
            label: self.label.clone(),
        })?;
        components.restore_components_from_data(before.records())?;
        components.apply_components()?;
        tracing::debug!(command = %self.label, "command undone");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noco_core::{
        define_component, Component, ComponentType, ControllerError, ControllerSettings,
        MemoryHost,
    };
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Marker {}
    impl Component for Marker {}
    define_component!(Marker, "command_tests::Marker");

    #[test]
    fn labels_use_short_type_name() {
        let add = EditAction::Add {
            type_name: "game::parts::Spinner".into(),
        };
        assert_eq!(add.label("Cube"), "Add Component Cube: Spinner");
        assert_eq!(
            EditAction::Remove { index: 2 }.label("Cube"),
            "Remove Component Cube: 2"
        );
    }

    #[test]
    fn undo_before_execute_is_rejected() {
        let mut components = ComponentsController::default();
        let mut command = ComponentCommand::new("Cube", EditAction::Remove { index: 0 });
        assert!(matches!(
            command.undo(&mut components),
            Err(EditorError::NotPerformed { .. })
        ));
    }

    #[test]
    fn failed_persist_rolls_the_edit_back() {
        Marker::ensure_registered().unwrap();
        let host = MemoryHost::new("Cube")
            .with_records([format!("{}|{{}}", Marker::TYPE_NAME)])
            .into_ref();
        let mut components = ComponentsController::new(ControllerSettings::live());
        components.initialize(host.clone()).unwrap();
        drop(host);

        let mut command = ComponentCommand::new(
            "Cube",
            EditAction::Add {
                type_name: Marker::TYPE_NAME.to_string(),
            },
        );
        assert!(matches!(
            command.execute(&mut components),
            Err(EditorError::Controller(ControllerError::HostReleased { .. }))
        ));
        assert_eq!(components.count(), 1);
        assert!(matches!(
            command.undo(&mut components),
            Err(EditorError::NotPerformed { .. })
        ));
    }
}
