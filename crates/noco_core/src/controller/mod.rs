//! Components controller
//!
//! Owns the ordered component list of one host node, drives lifecycle hooks
//! in list order, and round-trips the list through the host adapter.
//!
//! Failures are split in two:
//! - soft failures (bad records, failing hooks) are isolated per component and
//!   reported to the diagnostics sink; the operation carries on.
//! - caller-contract violations (bad index, unknown type, wrong state) come
//!   back as [`ControllerError`].

mod error;
mod lifecycle;
mod slot;
mod snapshot;

pub use error::ControllerError;
pub use lifecycle::{ControllerSettings, ExecutionContext, LifecycleState, RestoreMode};
pub use snapshot::Snapshot;

use crate::codec::RecordCodec;
use crate::component::{ComponentType, DynComponent, Owner};
use crate::diagnostics::{DiagnosticSink, HookKind, TracingSink};
use crate::host::{HostAdapter, HostRef};
use crate::registry::{register_component, resolve_type, ComponentDescriptor};
use noco_metrics::{time_scope, HookCounter, PhaseProfiler};
use slot::ComponentSlot;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

const UNBOUND_HOST: &str = "<unbound>";

pub struct ComponentsController {
    settings: ControllerSettings,
    state: LifecycleState,
    slots: Vec<Option<ComponentSlot>>,
    host: Option<Weak<RefCell<dyn HostAdapter>>>,
    host_name: Rc<str>,
    sink: Rc<dyn DiagnosticSink>,
    profiler: PhaseProfiler,
    hooks: HookCounter,
}

impl ComponentsController {
    /// Create a controller that reports diagnostics through `tracing`.
    pub fn new(settings: ControllerSettings) -> Self {
        Self::with_sink(settings, Rc::new(TracingSink))
    }

    pub fn with_sink(settings: ControllerSettings, sink: Rc<dyn DiagnosticSink>) -> Self {
        Self {
            settings,
            state: LifecycleState::Uninitialized,
            slots: Vec::new(),
            host: None,
            host_name: Rc::from(UNBOUND_HOST),
            sink,
            profiler: PhaseProfiler::new(),
            hooks: HookCounter::new(),
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Name of the bound host, kept for diagnostics after the host is released.
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Number of slots, including empty ones left by records that failed to parse.
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn profiler(&self) -> &PhaseProfiler {
        &self.profiler
    }

    pub fn hook_counter(&self) -> &HookCounter {
        &self.hooks
    }

    // ------------------------------------------------------------------
    // Tree lifecycle
    // ------------------------------------------------------------------

    /// Bind the host and load its persisted records.
    ///
    /// Allowed from `Uninitialized` and, to re-enter a tree, from `Disposed`.
    pub fn initialize(&mut self, host: HostRef) -> Result<(), ControllerError> {
        if !matches!(
            self.state,
            LifecycleState::Uninitialized | LifecycleState::Disposed
        ) {
            return Err(ControllerError::InvalidState {
                operation: "initialize",
                state: self.state,
            });
        }

        let name = host
            .try_borrow()
            .map_err(|_| ControllerError::HostBusy {
                host: self.host_name.to_string(),
            })?
            .name()
            .to_string();
        self.host_name = Rc::from(name);
        self.host = Some(Rc::downgrade(&host));
        self.state = LifecycleState::Uninitialized;
        self.populate()
    }

    /// Make sure the list is loaded. No-op once populated.
    pub fn enter_tree(&mut self) -> Result<(), ControllerError> {
        if self.state.is_populated() {
            return Ok(());
        }
        if self.host.is_none() {
            return Err(ControllerError::Unbound);
        }
        self.populate()
    }

    /// `Populated -> Live`, calling `start` on every enabled component.
    /// In the inspection context this moves to `Inspecting` without `start`.
    pub fn ready(&mut self) -> Result<(), ControllerError> {
        match (self.state, self.settings.context) {
            (LifecycleState::Populated, ExecutionContext::Live) => {
                self.state = LifecycleState::Live;
                let sink = &*self.sink;
                for (index, slot) in self.slots.iter_mut().enumerate() {
                    if let Some(slot) = slot {
                        slot.start_if_pending(index, sink);
                    }
                }
                tracing::debug!(host = %self.host_name, components = self.slots.len(), "controller live");
                Ok(())
            }
            (LifecycleState::Populated, ExecutionContext::Inspection) => {
                self.state = LifecycleState::Inspecting;
                tracing::debug!(host = %self.host_name, "controller inspecting");
                Ok(())
            }
            (state, _) => Err(ControllerError::InvalidState {
                operation: "ready",
                state,
            }),
        }
    }

    /// Per-frame pass: `update` on every enabled component, in list order.
    pub fn process(&mut self, delta: f64) -> Result<(), ControllerError> {
        self.frame_pass(HookKind::Update, "process", delta)
    }

    /// Per-physics-tick pass: `fixed_update` on every enabled component.
    pub fn physics_process(&mut self, delta: f64) -> Result<(), ControllerError> {
        self.frame_pass(HookKind::FixedUpdate, "physics process", delta)
    }

    /// Disable and destroy every component, clear the list, release the host.
    pub fn exit_tree(&mut self) -> Result<(), ControllerError> {
        self.require_populated("exit tree")?;
        let sink = &*self.sink;
        for (index, slot) in std::mem::take(&mut self.slots).into_iter().enumerate() {
            if let Some(slot) = slot {
                slot.teardown(index, sink);
            }
        }
        self.host = None;
        self.state = LifecycleState::Disposed;
        tracing::debug!(host = %self.host_name, "controller disposed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Append a default `T`, run `awake`/`on_enable`, and return it.
    pub fn add_component<T: ComponentType>(&mut self) -> Result<&mut T, ControllerError> {
        let index = self.add_component_of(ComponentDescriptor::of::<T>())?;
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .and_then(|slot| slot.component.downcast_mut::<T>())
            .ok_or(ControllerError::EmptySlot { index })
    }

    /// Append a default instance of a registered type. Returns its index.
    pub fn add_component_by_name(&mut self, type_name: &str) -> Result<usize, ControllerError> {
        let descriptor = resolve_type(type_name).ok_or_else(|| ControllerError::UnknownType {
            name: type_name.to_string(),
        })?;
        self.add_component_of(descriptor)
    }

    /// Append a default instance described by `descriptor`. Returns its index.
    pub fn add_component_of(
        &mut self,
        descriptor: ComponentDescriptor,
    ) -> Result<usize, ControllerError> {
        self.require_populated("add component")?;
        register_component(descriptor)?;

        let index = self.slots.len();
        let mut slot = ComponentSlot::new(descriptor.create(), self.owner()?);
        slot.awake_and_enable(index, &*self.sink);
        self.slots.push(Some(slot));
        tracing::debug!(
            host = %self.host_name,
            index,
            component = descriptor.type_name(),
            "added component"
        );
        Ok(index)
    }

    /// Disable and destroy the component at `index`, then unlink the slot.
    pub fn remove_component_at(&mut self, index: usize) -> Result<(), ControllerError> {
        self.require_populated("remove component")?;
        self.check_index(index)?;
        if let Some(slot) = self.slots[index].take() {
            slot.teardown(index, &*self.sink);
        }
        self.slots.remove(index);
        tracing::debug!(host = %self.host_name, index, "removed component");
        Ok(())
    }

    /// Swap with the previous slot. Returns `false` at index 0.
    pub fn move_up_component(&mut self, index: usize) -> Result<bool, ControllerError> {
        self.require_populated("move component")?;
        self.check_index(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.slots.swap(index - 1, index);
        Ok(true)
    }

    /// Swap with the next slot. Returns `false` at the last index.
    pub fn move_down_component(&mut self, index: usize) -> Result<bool, ControllerError> {
        self.require_populated("move component")?;
        self.check_index(index)?;
        if index + 1 >= self.slots.len() {
            return Ok(false);
        }
        self.slots.swap(index, index + 1);
        Ok(true)
    }

    /// Replace the component at `index` with a fresh default of the same type.
    pub fn reset_component(&mut self, index: usize) -> Result<(), ControllerError> {
        self.require_populated("reset component")?;
        self.check_index(index)?;
        let type_name = self.slots[index]
            .as_ref()
            .map(|slot| slot.component.type_name())
            .ok_or(ControllerError::EmptySlot { index })?;
        let descriptor = resolve_type(type_name).ok_or_else(|| ControllerError::UnknownType {
            name: type_name.to_string(),
        })?;
        let mut fresh = ComponentSlot::new(descriptor.create(), self.owner()?);

        if let Some(old) = self.slots[index].take() {
            old.teardown(index, &*self.sink);
        }
        fresh.awake_and_enable(index, &*self.sink);
        self.slots[index] = Some(fresh);
        tracing::debug!(host = %self.host_name, index, component = type_name, "reset component");
        Ok(())
    }

    /// Toggle a component. Returns `false` if it already had that state.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<bool, ControllerError> {
        self.require_populated("set enabled")?;
        self.check_index(index)?;
        let sink = &*self.sink;
        let slot = self.slots[index]
            .as_mut()
            .ok_or(ControllerError::EmptySlot { index })?;
        Ok(slot.set_enabled(index, enabled, sink))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize the full list and hand it to the host adapter.
    pub fn apply_components(&mut self) -> Result<(), ControllerError> {
        let records = self.get_components_to_data();
        let host = self.upgrade_host()?;
        let mut adapter = host
            .try_borrow_mut()
            .map_err(|_| ControllerError::HostBusy {
                host: self.host_name.to_string(),
            })?;
        tracing::debug!(host = %self.host_name, records = records.len(), "persisting components");
        adapter.persist(records);
        Ok(())
    }

    /// Serialize the current list without touching any state.
    pub fn get_components_to_data(&self) -> Vec<String> {
        let codec = RecordCodec::new(&self.host_name, &*self.sink);
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| codec.serialize(slot.as_ref().map(|slot| &*slot.component), index))
            .collect()
    }

    pub fn get_snapshot(&self) -> Snapshot {
        Snapshot::from(self.get_components_to_data())
    }

    /// Replace the list from raw records using the configured restore mode.
    pub fn restore_components_from_data(&mut self, records: &[String]) -> Result<(), ControllerError> {
        self.replace_slots(records, self.settings.restore_hooks)
    }

    /// Replace the list from a snapshot.
    pub fn restore_from_snapshot(
        &mut self,
        snapshot: &Snapshot,
        mode: RestoreMode,
    ) -> Result<(), ControllerError> {
        self.replace_slots(snapshot.records(), mode)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Component at `index`; `None` for out-of-range or empty slots.
    pub fn get_component_at(&self, index: usize) -> Option<&dyn DynComponent> {
        match self.slots.get(index) {
            Some(Some(slot)) => Some(&*slot.component),
            _ => None,
        }
    }

    pub fn get_component_at_mut(&mut self, index: usize) -> Option<&mut (dyn DynComponent + 'static)> {
        match self.slots.get_mut(index) {
            Some(Some(slot)) => Some(slot.component.as_mut()),
            _ => None,
        }
    }

    /// First component of type `T`, in list order.
    pub fn get_component<T: ComponentType>(&self) -> Option<&T> {
        self.slots
            .iter()
            .flatten()
            .find_map(|slot| slot.component.downcast_ref::<T>())
    }

    pub fn get_component_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .flatten()
            .find_map(|slot| slot.component.downcast_mut::<T>())
    }

    /// Every component of type `T`, in list order.
    pub fn get_components<T: ComponentType>(&self) -> Vec<&T> {
        self.slots
            .iter()
            .flatten()
            .filter_map(|slot| slot.component.downcast_ref::<T>())
            .collect()
    }

    /// Enabled flag of the component at `index`; `None` for empty slots.
    pub fn is_enabled(&self, index: usize) -> Option<bool> {
        self.slots.get(index)?.as_ref().map(|slot| slot.enabled)
    }

    /// Type identifier per slot, `None` for empty slots.
    pub fn type_names(&self) -> Vec<Option<&'static str>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|slot| slot.component.type_name()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn populate(&mut self) -> Result<(), ControllerError> {
        let host = self.upgrade_host()?;
        let records = host
            .try_borrow()
            .map_err(|_| ControllerError::HostBusy {
                host: self.host_name.to_string(),
            })?
            .retrieve()
            .unwrap_or_default();
        drop(host);

        self.load_slots(&records, RestoreMode::Run)?;
        self.state = LifecycleState::Populated;
        tracing::debug!(host = %self.host_name, components = self.slots.len(), "components loaded");
        Ok(())
    }

    fn replace_slots(&mut self, records: &[String], mode: RestoreMode) -> Result<(), ControllerError> {
        self.require_populated("restore components")?;
        let previous = std::mem::take(&mut self.slots);
        match mode {
            RestoreMode::Run => {
                for (index, slot) in previous.into_iter().enumerate() {
                    if let Some(slot) = slot {
                        slot.teardown(index, &*self.sink);
                    }
                }
            }
            RestoreMode::Suppress => drop(previous),
        }
        self.load_slots(records, mode)?;
        tracing::debug!(host = %self.host_name, components = self.slots.len(), ?mode, "components restored");
        Ok(())
    }

    /// Parse `records` into fresh slots. A record that fails to parse leaves an
    /// empty slot so later indices keep their numbering.
    fn load_slots(&mut self, records: &[String], mode: RestoreMode) -> Result<(), ControllerError> {
        let host = self.host.clone().ok_or(ControllerError::Unbound)?;
        let already_live = self.state == LifecycleState::Live;
        let sink = &*self.sink;
        let codec = RecordCodec::new(&self.host_name, sink);

        let mut slots = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let slot = codec.deserialize(record, index).map(|component| {
                let owner = Owner::new(host.clone(), self.host_name.clone());
                let mut slot = ComponentSlot::new(component, owner);
                match mode {
                    RestoreMode::Run => slot.awake_and_enable(index, sink),
                    RestoreMode::Suppress => slot.started = already_live,
                }
                slot
            });
            slots.push(slot);
        }
        self.slots = slots;
        Ok(())
    }

    fn frame_pass(
        &mut self,
        kind: HookKind,
        operation: &'static str,
        delta: f64,
    ) -> Result<(), ControllerError> {
        if self.state != LifecycleState::Live {
            if self.settings.context == ExecutionContext::Inspection {
                return self.ensure_inspection_populated(operation);
            }
            return Err(ControllerError::InvalidState {
                operation,
                state: self.state,
            });
        }

        let Self {
            slots,
            sink,
            profiler,
            hooks,
            ..
        } = self;
        time_scope!(profiler, kind.as_str(), {
            let (calls, failures) = dispatch_frame(slots, &**sink, kind, delta);
            hooks.record(kind.as_str(), calls, failures);
        });
        Ok(())
    }

    /// Design-time hosts never dispatch frame hooks, but load lazily on the
    /// first frame if nothing else did.
    fn ensure_inspection_populated(&mut self, operation: &'static str) -> Result<(), ControllerError> {
        match self.state {
            state if state.is_populated() => Ok(()),
            LifecycleState::Uninitialized if self.host.is_some() => self.populate(),
            state => Err(ControllerError::InvalidState { operation, state }),
        }
    }

    fn require_populated(&self, operation: &'static str) -> Result<(), ControllerError> {
        if self.state.is_populated() {
            Ok(())
        } else {
            Err(ControllerError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn check_index(&self, index: usize) -> Result<(), ControllerError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(ControllerError::IndexOutOfRange {
                index,
                count: self.slots.len(),
            })
        }
    }

    fn upgrade_host(&self) -> Result<HostRef, ControllerError> {
        self.host
            .as_ref()
            .ok_or(ControllerError::Unbound)?
            .upgrade()
            .ok_or_else(|| ControllerError::HostReleased {
                host: self.host_name.to_string(),
            })
    }

    fn owner(&self) -> Result<Owner, ControllerError> {
        let host = self.host.clone().ok_or(ControllerError::Unbound)?;
        Ok(Owner::new(host, self.host_name.clone()))
    }
}

impl Default for ComponentsController {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

/// Run one frame hook over every enabled component. Returns `(calls, failures)`.
fn dispatch_frame(
    slots: &mut [Option<ComponentSlot>],
    sink: &dyn DiagnosticSink,
    kind: HookKind,
    delta: f64,
) -> (usize, usize) {
    let mut calls = 0;
    let mut failures = 0;
    for (index, slot) in slots.iter_mut().enumerate() {
        let Some(slot) = slot else { continue };
        if !slot.enabled {
            continue;
        }
        slot.start_if_pending(index, sink);
        calls += 1;
        let ok = match kind {
            HookKind::FixedUpdate => {
                slot.invoke(index, kind, sink, |c, ctx| c.fixed_update(ctx, delta))
            }
            _ => slot.invoke(index, kind, sink, |c, ctx| c.update(ctx, delta)),
        };
        if !ok {
            failures += 1;
        }
    }
    tracing::trace!(hook = %kind, calls, failures, "frame pass");
    (calls, failures)
}
