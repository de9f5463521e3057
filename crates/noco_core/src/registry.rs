// registry.rs - Runtime component type registration
//
// Component types are identified by stable string names, not Rust TypeIds,
// so persisted records survive a rebuild of the same program.

use crate::codec::SEPARATOR;
use crate::component::{BoxedComponent, ComponentType};
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Errors raised while registering a component type.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("component type name '{name}' is already registered for a different type")]
    NameConflict { name: &'static str },

    #[error("component type name '{name}' is empty or contains the record separator")]
    InvalidName { name: &'static str },
}

/// Factory table for one component type.
#[derive(Clone, Copy)]
pub struct ComponentDescriptor {
    type_name: &'static str,
    type_id: TypeId,
    create: fn() -> BoxedComponent,
    decode: fn(&str) -> Result<BoxedComponent, serde_json::Error>,
}

fn create_default<T: ComponentType>() -> BoxedComponent {
    Box::new(T::default())
}

fn decode_payload<T: ComponentType>(payload: &str) -> Result<BoxedComponent, serde_json::Error> {
    let component: T = serde_json::from_str(payload)?;
    Ok(Box::new(component))
}

impl ComponentDescriptor {
    pub fn of<T: ComponentType>() -> Self {
        Self {
            type_name: T::TYPE_NAME,
            type_id: TypeId::of::<T>(),
            create: create_default::<T>,
            decode: decode_payload::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Construct a fresh default instance.
    pub fn create(&self) -> BoxedComponent {
        (self.create)()
    }

    /// Parse a payload into an instance of this type.
    pub fn decode(&self, payload: &str) -> Result<BoxedComponent, serde_json::Error> {
        (self.decode)(payload)
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl PartialEq for ComponentDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.type_name == other.type_name
    }
}

/// Global registry for every component type that can appear in a record.
static REGISTRY: Lazy<RwLock<HashMap<&'static str, ComponentDescriptor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a component type. Re-registering the same type is a no-op.
///
/// Names must be non-empty and free of the record separator, or records of
/// the type could not be decoded again.
pub fn register_component(descriptor: ComponentDescriptor) -> Result<(), RegistryError> {
    if descriptor.type_name.is_empty() || descriptor.type_name.contains(SEPARATOR) {
        return Err(RegistryError::InvalidName {
            name: descriptor.type_name,
        });
    }
    let mut map = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    match map.get(descriptor.type_name) {
        Some(existing) if existing.type_id != descriptor.type_id => {
            Err(RegistryError::NameConflict {
                name: descriptor.type_name,
            })
        }
        Some(_) => Ok(()),
        None => {
            tracing::debug!(component = descriptor.type_name, "registered component type");
            map.insert(descriptor.type_name, descriptor);
            Ok(())
        }
    }
}

/// Look up a component type by its identifier.
pub fn resolve_type(name: &str) -> Option<ComponentDescriptor> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .copied()
}

/// All registered identifiers, sorted.
pub fn registered_types() -> Vec<&'static str> {
    let mut names: Vec<_> = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .copied()
        .collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use serde::{Deserialize, Serialize};

    #[derive(Default, Serialize, Deserialize)]
    struct Alpha {
        value: i32,
    }
    impl Component for Alpha {}
    crate::define_component!(Alpha, "registry_tests::Alpha");

    #[derive(Default, Serialize, Deserialize)]
    struct Impostor {}
    impl Component for Impostor {}
    crate::define_component!(Impostor, "registry_tests::Alpha");

    #[derive(Default, Serialize, Deserialize)]
    struct Piped {
        v: i32,
    }
    impl Component for Piped {}
    crate::define_component!(Piped, "registry_tests|Piped");

    #[derive(Default, Serialize, Deserialize)]
    struct Nameless {}
    impl Component for Nameless {}
    crate::define_component!(Nameless, "");

    #[test]
    fn register_then_resolve() {
        Alpha::ensure_registered().unwrap();
        Alpha::ensure_registered().unwrap();

        let descriptor = resolve_type("registry_tests::Alpha").unwrap();
        assert_eq!(descriptor, ComponentDescriptor::of::<Alpha>());
        assert!(registered_types().contains(&"registry_tests::Alpha"));

        let decoded = descriptor.decode(r#"{"value":3}"#).unwrap();
        assert_eq!(decoded.downcast_ref::<Alpha>().unwrap().value, 3);
    }

    #[test]
    fn conflicting_name_is_rejected() {
        Alpha::ensure_registered().unwrap();
        let err = Impostor::ensure_registered().unwrap_err();
        assert!(matches!(err, RegistryError::NameConflict { .. }));
    }

    #[test]
    fn names_that_break_records_are_rejected() {
        let err = Piped::ensure_registered().unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidName {
                name: "registry_tests|Piped"
            }
        ));
        assert!(resolve_type("registry_tests|Piped").is_none());
        assert!(resolve_type("registry_tests").is_none());

        assert!(matches!(
            Nameless::ensure_registered(),
            Err(RegistryError::InvalidName { name: "" })
        ));
        assert!(!registered_types().contains(&""));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        assert!(resolve_type("registry_tests::Missing").is_none());
    }
}
