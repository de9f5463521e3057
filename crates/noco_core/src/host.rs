//! Host adapter contract
//!
//! A host node implements [`HostAdapter`] to give the controller somewhere to
//! persist its record array. The controller only ever holds a weak reference.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a host adapter.
pub type HostRef = Rc<RefCell<dyn HostAdapter>>;

/// Storage and identity supplied by a host node.
pub trait HostAdapter {
    /// Identity used to tag diagnostics.
    fn name(&self) -> &str;

    /// Store the record array keyed to this host. An empty array means
    /// "no components" and should make `retrieve` report absent.
    fn persist(&mut self, records: Vec<String>);

    /// Last persisted array, or `None` if nothing was ever stored.
    fn retrieve(&self) -> Option<Vec<String>>;
}

/// Host adapter backed by a plain field. Useful for tools and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    name: String,
    records: Option<Vec<String>>,
    persist_count: usize,
}

impl MemoryHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: None,
            persist_count: 0,
        }
    }

    /// Seed the host with an already persisted array.
    pub fn with_records<I, S>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records = Some(records.into_iter().map(Into::into).collect());
        self
    }

    /// Wrap into a shared handle suitable for `ComponentsController::initialize`.
    pub fn into_ref(self) -> Rc<RefCell<MemoryHost>> {
        Rc::new(RefCell::new(self))
    }

    pub fn records(&self) -> Option<&[String]> {
        self.records.as_deref()
    }

    /// Number of times `persist` has been called.
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }
}

impl HostAdapter for MemoryHost {
    fn name(&self) -> &str {
        &self.name
    }

    fn persist(&mut self, records: Vec<String>) {
        self.persist_count += 1;
        self.records = if records.is_empty() {
            None
        } else {
            Some(records)
        };
    }

    fn retrieve(&self) -> Option<Vec<String>> {
        self.records.clone()
    }
}
