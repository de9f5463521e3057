//! Diagnostics channel for soft failures
//!
//! Parse failures, serialize failures and hook errors never propagate out of
//! the controller. They are turned into a [`Diagnostic`] and handed to a
//! [`DiagnosticSink`].

use std::cell::RefCell;
use std::fmt;

/// Lifecycle hook that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Awake,
    OnEnable,
    Start,
    Update,
    FixedUpdate,
    OnDisable,
    OnDestroy,
}

impl HookKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HookKind::Awake => "awake",
            HookKind::OnEnable => "on_enable",
            HookKind::Start => "start",
            HookKind::Update => "update",
            HookKind::FixedUpdate => "fixed_update",
            HookKind::OnDisable => "on_disable",
            HookKind::OnDestroy => "on_destroy",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation during which a soft failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Turning a record back into a component.
    Parse,
    /// Turning a component into a record.
    Serialize,
    /// A lifecycle hook returned an error or panicked.
    Hook(HookKind),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Parse => f.write_str("parse"),
            Operation::Serialize => f.write_str("serialize"),
            Operation::Hook(kind) => write!(f, "hook:{kind}"),
        }
    }
}

/// Structured soft-failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub host: String,
    pub operation: Operation,
    pub index: Option<usize>,
    pub component: Option<&'static str>,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(
        host: impl Into<String>,
        operation: Operation,
        index: Option<usize>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            operation,
            index,
            component: None,
            detail: detail.into(),
        }
    }

    pub fn with_component(mut self, component: &'static str) -> Self {
        self.component = Some(component);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node {}, {}", self.host, self.operation)?;
        if let Some(index) = self.index {
            write!(f, " at index {index}")?;
        }
        if let Some(component) = self.component {
            write!(f, " ({component})")?;
        }
        write!(f, ": {}", self.detail)
    }
}

/// Consumer of soft-failure reports.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: every diagnostic becomes a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.operation {
            Operation::Hook(kind) => tracing::warn!(
                host = %diagnostic.host,
                hook = %kind,
                index = ?diagnostic.index,
                component = ?diagnostic.component,
                "{}",
                diagnostic.detail
            ),
            operation => tracing::error!(
                host = %diagnostic.host,
                %operation,
                index = ?diagnostic.index,
                component = ?diagnostic.component,
                "{}",
                diagnostic.detail
            ),
        }
    }
}

/// Sink that keeps every diagnostic in memory, and forwards to `tracing` as well.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        TracingSink.report(diagnostic.clone());
        self.entries.borrow_mut().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names() {
        let names: Vec<String> = [
            Operation::Parse,
            Operation::Serialize,
            Operation::Hook(HookKind::OnDestroy),
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(names, vec!["parse", "serialize", "hook:on_destroy"]);
    }

    #[test]
    fn display_includes_host_and_index() {
        let diagnostic = Diagnostic::new("Player", Operation::Parse, Some(2), "type Foo not found");
        assert_eq!(
            diagnostic.to_string(),
            "Node Player, parse at index 2: type Foo not found"
        );
    }

    #[test]
    fn recording_sink_drains() {
        let sink = RecordingSink::new();
        sink.report(
            Diagnostic::new("n", Operation::Hook(HookKind::Update), Some(0), "boom")
                .with_component("demo::Boom"),
        );
        assert_eq!(sink.len(), 1);
        let drained = sink.take();
        assert_eq!(drained[0].component, Some("demo::Boom"));
        assert!(sink.is_empty());
    }
}
