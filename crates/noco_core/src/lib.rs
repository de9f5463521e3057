//! Node Components Core
//!
//! Lets a host tree node own an ordered list of behaviour components:
//! - Component trait with Unity-style lifecycle hooks
//! - Type registry (stable string identifiers -> factories)
//! - Record codec (`type|json`) with fail-soft diagnostics
//! - Components controller (lifecycle phases, structural edits, snapshots)
//!
//! # Example
//!
//! ```ignore
//! use noco_core::{define_component, Component, ComponentsController, ControllerSettings, MemoryHost};
//!
//! #[derive(Default, serde::Serialize, serde::Deserialize)]
//! struct Spinner { speed: f64 }
//! impl Component for Spinner {}
//! define_component!(Spinner);
//!
//! let host = MemoryHost::new("Player").into_ref();
//! let mut components = ComponentsController::new(ControllerSettings::live());
//! components.initialize(host.clone())?;
//! components.add_component::<Spinner>()?.speed = 2.0;
//! components.apply_components()?;
//! ```

pub mod codec;
pub mod component;
pub mod controller;
pub mod diagnostics;
pub mod host;
pub mod registry;

pub use codec::{CodecError, RecordCodec};
pub use component::{
    BoxedComponent, Component, ComponentType, DynComponent, HookContext, HookResult, Owner,
};
pub use controller::{
    ComponentsController, ControllerError, ControllerSettings, ExecutionContext, LifecycleState,
    RestoreMode, Snapshot,
};
pub use diagnostics::{Diagnostic, DiagnosticSink, HookKind, Operation, RecordingSink, TracingSink};
pub use host::{HostAdapter, HostRef, MemoryHost};
pub use registry::{
    register_component, registered_types, resolve_type, ComponentDescriptor, RegistryError,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
