//! Controller lifecycle states and construction-time settings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implicit state machine driven by the host's tree-lifecycle calls.
///
/// ```text
/// Uninitialized -> Populated -> Live -------> Disposed
///                           \-> Inspecting -/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Uninitialized,
    Populated,
    Live,
    Inspecting,
    Disposed,
}

impl LifecycleState {
    /// Whether the component list is loaded and may be edited.
    pub fn is_populated(self) -> bool {
        matches!(
            self,
            LifecycleState::Populated | LifecycleState::Live | LifecycleState::Inspecting
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Populated => "populated",
            LifecycleState::Live => "live",
            LifecycleState::Inspecting => "inspecting",
            LifecycleState::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// Whether the host is running the game or being inspected at design time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionContext {
    #[default]
    Live,
    Inspection,
}

/// Whether restoring a snapshot re-runs creation hooks on the new instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreMode {
    /// Tear down the current instances and treat the restore as a fresh load.
    #[default]
    Run,
    /// Swap instances without any hooks; for undo bookkeeping where hooks
    /// already ran once.
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub context: ExecutionContext,
    /// Mode used by `restore_components_from_data`.
    pub restore_hooks: RestoreMode,
}

impl ControllerSettings {
    pub fn live() -> Self {
        Self::default()
    }

    pub fn inspection() -> Self {
        Self {
            context: ExecutionContext::Inspection,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_parse_with_defaults() {
        let settings: ControllerSettings =
            serde_json::from_str(r#"{"context":"inspection"}"#).unwrap();
        assert_eq!(settings.context, ExecutionContext::Inspection);
        assert_eq!(settings.restore_hooks, RestoreMode::Run);
    }

    #[test]
    fn populated_states() {
        assert!(!LifecycleState::Uninitialized.is_populated());
        assert!(LifecycleState::Inspecting.is_populated());
        assert!(!LifecycleState::Disposed.is_populated());
    }
}
