//! Node Components Editor
//!
//! Scripted design-time session: loads a node in the inspection context,
//! applies a few undoable edits and writes the scene save.

use anyhow::Result;
use noco_core::{
    define_component, Component, ComponentType, ComponentsController, ExecutionContext,
};
use noco_editor::{component_rows, ComponentCommand, EditAction, UndoHistory};
use noco_services::{NodeKind, SceneNode, SceneSave, Settings};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Free-form annotation attached to a node.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Note {
    text: String,
}
impl Component for Note {}
define_component!(Note);

fn main() -> Result<()> {
    let settings = Settings::load("noco.json")?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Node Components Editor v{}", noco_core::VERSION);
    Note::ensure_registered()?;

    let node = SceneNode::new("Cube", NodeKind::Node3D).into_ref();
    let mut controller_settings = settings.controller;
    controller_settings.context = ExecutionContext::Inspection;
    let mut components = ComponentsController::new(controller_settings);
    components.initialize(node.clone())?;
    components.enter_tree()?;
    components.ready()?;

    let mut history = UndoHistory::default();
    for action in [
        EditAction::Add {
            type_name: Note::TYPE_NAME.to_string(),
        },
        EditAction::Add {
            type_name: Note::TYPE_NAME.to_string(),
        },
        EditAction::MoveDown { index: 0 },
        EditAction::Remove { index: 1 },
    ] {
        let command = ComponentCommand::new("Cube", action);
        tracing::info!(command = command.label(), "perform");
        history.perform(command, &mut components)?;
    }

    let undone = history.undo(&mut components)?.to_string();
    tracing::info!(command = %undone, "undo");

    for row in component_rows(&components) {
        tracing::info!(
            index = row.index,
            component = %row.short_name,
            enabled = row.enabled,
            "component"
        );
    }

    let saved_node = node.borrow().clone();
    components.exit_tree()?;
    SceneSave::new(vec![saved_node]).write(&settings.save.path)?;

    tracing::info!("Editor session finished");
    Ok(())
}
