// slot.rs - One live component plus the state the controller keeps for it
//
// Every hook call goes through `ComponentSlot::invoke`, which isolates
// returned errors and panics so a bad component can't halt a pass.

use crate::component::{BoxedComponent, DynComponent, HookContext, HookResult, Owner};
use crate::diagnostics::{Diagnostic, DiagnosticSink, HookKind, Operation};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub(crate) struct ComponentSlot {
    pub(crate) component: BoxedComponent,
    pub(crate) owner: Owner,
    pub(crate) enabled: bool,
    pub(crate) started: bool,
}

impl ComponentSlot {
    pub(crate) fn new(component: BoxedComponent, owner: Owner) -> Self {
        Self {
            component,
            owner,
            enabled: true,
            started: false,
        }
    }

    /// Run one hook in isolation. Returns `false` if it failed.
    pub(crate) fn invoke<F>(
        &mut self,
        index: usize,
        kind: HookKind,
        sink: &dyn DiagnosticSink,
        hook: F,
    ) -> bool
    where
        F: FnOnce(&mut dyn DynComponent, &HookContext<'_>) -> HookResult,
    {
        let ctx = HookContext::new(&self.owner, index);
        let component = self.component.as_mut();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| hook(component, &ctx)));
        let detail = match outcome {
            Ok(Ok(())) => return true,
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };
        sink.report(
            Diagnostic::new(self.owner.name(), Operation::Hook(kind), Some(index), detail)
                .with_component(self.component.type_name()),
        );
        false
    }

    /// `awake`, then `on_enable` if the slot is enabled.
    pub(crate) fn awake_and_enable(&mut self, index: usize, sink: &dyn DiagnosticSink) {
        self.invoke(index, HookKind::Awake, sink, |c, ctx| c.awake(ctx));
        if self.enabled {
            self.invoke(index, HookKind::OnEnable, sink, |c, ctx| c.on_enable(ctx));
        }
    }

    /// Flip the enabled flag. Returns whether anything changed.
    pub(crate) fn set_enabled(&mut self, index: usize, enabled: bool, sink: &dyn DiagnosticSink) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        if enabled {
            self.invoke(index, HookKind::OnEnable, sink, |c, ctx| c.on_enable(ctx));
        } else {
            self.invoke(index, HookKind::OnDisable, sink, |c, ctx| c.on_disable(ctx));
        }
        true
    }

    /// `start` exactly once, and only while enabled.
    pub(crate) fn start_if_pending(&mut self, index: usize, sink: &dyn DiagnosticSink) {
        if self.enabled && !self.started {
            self.started = true;
            self.invoke(index, HookKind::Start, sink, |c, ctx| c.start(ctx));
        }
    }

    /// Disable (if enabled) then destroy. Consumes the slot.
    pub(crate) fn teardown(mut self, index: usize, sink: &dyn DiagnosticSink) {
        self.set_enabled(index, false, sink);
        self.invoke(index, HookKind::OnDestroy, sink, |c, ctx| c.on_destroy(ctx));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
