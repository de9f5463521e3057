use crate::controller::LifecycleState;
use crate::registry::RegistryError;
use thiserror::Error;

/// Caller-contract violations. Soft failures never show up here; they go to
/// the diagnostics sink instead.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("component index {index} is out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("component slot {index} is empty")]
    EmptySlot { index: usize },

    #[error("component type '{name}' is not registered")]
    UnknownType { name: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("cannot {operation} while the controller is {state}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },

    #[error("no host is bound to the controller")]
    Unbound,

    #[error("host '{host}' has been released")]
    HostReleased { host: String },

    #[error("host '{host}' is already borrowed")]
    HostBusy { host: String },
}
