// Shared fixtures for controller integration tests.
#![allow(dead_code)]

use noco_core::{
    define_component, Component, ComponentsController, ControllerSettings, HookContext,
    HookResult, MemoryHost, RecordingSink,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static JOURNAL: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

fn log(label: &str, hook: &str) {
    JOURNAL.with(|journal| journal.borrow_mut().push(format!("{label}:{hook}")));
}

/// Everything logged by probes on this test's thread, drained.
pub fn take_journal() -> Vec<String> {
    JOURNAL.with(|journal| std::mem::take(&mut *journal.borrow_mut()))
}

/// Records every hook it receives.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub label: String,
    pub value: i32,
    #[serde(skip)]
    pub updates: u32,
    #[serde(skip)]
    pub fixed_updates: u32,
}
define_component!(Probe, "tests::Probe");

impl Probe {
    pub fn labelled(label: &str, value: i32) -> Self {
        Self {
            label: label.to_string(),
            value,
            ..Self::default()
        }
    }
}

impl Component for Probe {
    fn awake(&mut self, _ctx: &HookContext<'_>) -> HookResult {
        log(&self.label, "awake");
        Ok(())
    }

    fn on_enable(&mut self, _ctx: &HookContext<'_>) -> HookResult {
        log(&self.label, "on_enable");
        Ok(())
    }

    fn start(&mut self, _ctx: &HookContext<'_>) -> HookResult {
        log(&self.label, "start");
        Ok(())
    }

    fn update(&mut self, _ctx: &HookContext<'_>, _delta: f64) -> HookResult {
        self.updates += 1;
        log(&self.label, "update");
        Ok(())
    }

    fn fixed_update(&mut self, _ctx: &HookContext<'_>, _delta: f64) -> HookResult {
        self.fixed_updates += 1;
        log(&self.label, "fixed_update");
        Ok(())
    }

    fn on_disable(&mut self, _ctx: &HookContext<'_>) -> HookResult {
        log(&self.label, "on_disable");
        Ok(())
    }

    fn on_destroy(&mut self, _ctx: &HookContext<'_>) -> HookResult {
        log(&self.label, "on_destroy");
        Ok(())
    }
}

/// Fails its frame hooks on demand.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Faulty {
    pub panic_on_update: bool,
}
define_component!(Faulty, "tests::Faulty");

impl Component for Faulty {
    fn update(&mut self, _ctx: &HookContext<'_>, _delta: f64) -> HookResult {
        if self.panic_on_update {
            panic!("faulty update");
        }
        anyhow::bail!("update refused")
    }

    fn fixed_update(&mut self, _ctx: &HookContext<'_>, _delta: f64) -> HookResult {
        anyhow::bail!("fixed update refused")
    }
}

/// Fails every construction and teardown hook.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Fragile {}
define_component!(Fragile, "tests::Fragile");

impl Component for Fragile {
    fn awake(&mut self, _ctx: &HookContext<'_>) -> HookResult {
        panic!("fragile awake");
    }

    fn on_enable(&mut self, _ctx: &HookContext<'_>) -> HookResult {
        anyhow::bail!("fragile enable")
    }

    fn on_destroy(&mut self, _ctx: &HookContext<'_>) -> HookResult {
        anyhow::bail!("fragile destroy")
    }
}

/// Component without persistable fields.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TypeA {}
define_component!(TypeA, "TypeA");
impl Component for TypeA {}

/// Remembers the owner it saw during `awake`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OwnerCheck {
    #[serde(skip)]
    pub seen_owner: String,
    #[serde(skip)]
    pub seen_index: usize,
}
define_component!(OwnerCheck, "tests::OwnerCheck");

impl Component for OwnerCheck {
    fn awake(&mut self, ctx: &HookContext<'_>) -> HookResult {
        self.seen_owner = ctx.owner().name().to_string();
        self.seen_index = ctx.index();
        Ok(())
    }
}

pub fn register_fixtures() {
    use noco_core::ComponentType;
    Probe::ensure_registered().unwrap();
    Faulty::ensure_registered().unwrap();
    Fragile::ensure_registered().unwrap();
    TypeA::ensure_registered().unwrap();
    OwnerCheck::ensure_registered().unwrap();
}

pub struct Fixture {
    pub host: Rc<RefCell<MemoryHost>>,
    pub sink: Rc<RecordingSink>,
    pub components: ComponentsController,
}

impl Fixture {
    pub fn with_settings(settings: ControllerSettings, records: &[&str]) -> Self {
        register_fixtures();
        let mut host = MemoryHost::new("Player");
        if !records.is_empty() {
            host = host.with_records(records.iter().copied());
        }
        let host = host.into_ref();
        let sink = Rc::new(RecordingSink::new());
        let mut components = ComponentsController::with_sink(settings, sink.clone());
        components.initialize(host.clone()).unwrap();
        Self {
            host,
            sink,
            components,
        }
    }

    /// Live-context controller, populated from `records`.
    pub fn live(records: &[&str]) -> Self {
        Self::with_settings(ControllerSettings::live(), records)
    }

    pub fn persisted(&self) -> Option<Vec<String>> {
        self.host.borrow().records().map(<[String]>::to_vec)
    }

    pub fn labels(&self) -> Vec<String> {
        self.components
            .get_components::<Probe>()
            .into_iter()
            .map(|probe| probe.label.clone())
            .collect()
    }
}

pub fn probe_record(label: &str, value: i32) -> String {
    format!(r#"tests::Probe|{{"label":"{label}","value":{value}}}"#)
}
