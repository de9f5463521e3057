// component.rs - Behaviour units attached to a host node
//
// A component is plain data plus lifecycle hooks. The enabled flag and the
// owner back-reference live in the controller's slot, never in the component
// itself, so neither can leak into the persisted payload.

use crate::host::{HostAdapter, HostRef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Result type returned by every lifecycle hook.
pub type HookResult = anyhow::Result<()>;

/// Owned, type-erased component instance as stored by the controller.
pub type BoxedComponent = Box<dyn DynComponent>;

/// Non-owning back-reference from a component to the host it is attached to.
///
/// The host name is captured when the owner is created so diagnostics can be
/// tagged even after the host is gone.
pub struct Owner {
    host: Weak<RefCell<dyn HostAdapter>>,
    name: Rc<str>,
}

impl Owner {
    pub(crate) fn new(host: Weak<RefCell<dyn HostAdapter>>, name: Rc<str>) -> Self {
        Self { host, name }
    }

    /// Name of the host node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upgrade to a strong handle. `None` once the host has been dropped.
    pub fn host(&self) -> Option<HostRef> {
        self.host.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.host.strong_count() > 0
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner")
            .field("name", &self.name)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Context handed to every hook invocation.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    owner: &'a Owner,
    index: usize,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(owner: &'a Owner, index: usize) -> Self {
        Self { owner, index }
    }

    pub fn owner(&self) -> &'a Owner {
        self.owner
    }

    /// Slot index of the component in its controller's list.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Lifecycle hooks of a behaviour unit. Every hook defaults to a no-op.
///
/// Ordering guaranteed by the controller:
/// - `awake` runs once, right after construction or deserialization, before `on_enable`.
/// - `on_enable`/`on_disable` run on every enabled-state transition.
/// - `start` runs once, in the live context only, before the first frame hook.
/// - `update`/`fixed_update` run every frame/physics tick while enabled.
/// - `on_destroy` runs once, after `on_disable`, before the component is dropped.
///
/// A hook that returns an error or panics is reported through the diagnostics
/// sink; the remaining components still run.
#[allow(unused_variables)]
pub trait Component: Any {
    fn awake(&mut self, ctx: &HookContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_enable(&mut self, ctx: &HookContext<'_>) -> HookResult {
        Ok(())
    }

    fn start(&mut self, ctx: &HookContext<'_>) -> HookResult {
        Ok(())
    }

    fn update(&mut self, ctx: &HookContext<'_>, delta: f64) -> HookResult {
        Ok(())
    }

    fn fixed_update(&mut self, ctx: &HookContext<'_>, delta: f64) -> HookResult {
        Ok(())
    }

    fn on_disable(&mut self, ctx: &HookContext<'_>) -> HookResult {
        Ok(())
    }

    fn on_destroy(&mut self, ctx: &HookContext<'_>) -> HookResult {
        Ok(())
    }
}

/// A component type that can be created by name and persisted.
///
/// Persistable fields are exactly what the serde derive serializes; mark
/// runtime-only state with `#[serde(skip)]`. Use a braced struct (`struct A {}`)
/// for components without persistable fields so the payload is `{}`.
pub trait ComponentType: Component + Serialize + DeserializeOwned + Default {
    /// Stable, fully-qualified type identifier written into records.
    const TYPE_NAME: &'static str;

    /// Register this type with the global registry.
    /// Should be called once during startup; repeated calls are harmless.
    fn ensure_registered() -> Result<(), crate::registry::RegistryError> {
        crate::registry::register_component(crate::registry::ComponentDescriptor::of::<Self>())
    }
}

/// Object-safe view over any [`ComponentType`].
pub trait DynComponent: Component {
    fn type_name(&self) -> &'static str;
    fn to_payload(&self) -> Result<String, serde_json::Error>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: ComponentType> DynComponent for T {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn DynComponent {
    pub fn downcast_ref<T: ComponentType>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: ComponentType>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Helper macro to implement the `ComponentType` trait.
///
/// Without an explicit name the identifier is the module path plus the type name.
///
/// # Example
/// ```ignore
/// #[derive(Default, Serialize, Deserialize)]
/// struct Spinner { speed: f64 }
/// impl Component for Spinner {}
///
/// define_component!(Spinner);
/// define_component!(Legacy, "game::Legacy");
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ident) => {
        impl $crate::ComponentType for $ty {
            const TYPE_NAME: &'static str = concat!(module_path!(), "::", stringify!($ty));
        }
    };
    ($ty:ty, $name:expr) => {
        impl $crate::ComponentType for $ty {
            const TYPE_NAME: &'static str = $name;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Marker {
        label: String,
        #[serde(skip)]
        scratch: u32,
    }
    impl Component for Marker {}
    crate::define_component!(Marker);

    #[test]
    fn type_name_defaults_to_module_path() {
        assert_eq!(Marker::TYPE_NAME, concat!(module_path!(), "::Marker"));
    }

    #[test]
    fn payload_skips_transient_fields() {
        let marker = Marker {
            label: "a".into(),
            scratch: 7,
        };
        assert_eq!(marker.to_payload().unwrap(), r#"{"label":"a"}"#);
    }

    #[test]
    fn downcast_through_dyn() {
        let boxed: BoxedComponent = Box::new(Marker::default());
        assert!(boxed.is::<Marker>());
        assert_eq!(boxed.downcast_ref::<Marker>(), Some(&Marker::default()));
    }
}
