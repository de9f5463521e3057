//! Flat description of a component list for display

use noco_core::ComponentsController;

/// One line of an inspector-style listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRow {
    pub index: usize,
    /// Fully-qualified identifier; empty for a slot whose record failed to parse.
    pub type_name: String,
    /// Last path segment, or "Null" for an empty slot.
    pub short_name: String,
    pub enabled: bool,
}

pub fn component_rows(components: &ComponentsController) -> Vec<ComponentRow> {
    components
        .type_names()
        .into_iter()
        .enumerate()
        .map(|(index, type_name)| {
            let type_name = type_name.unwrap_or_default();
            let short_name = match type_name.rsplit("::").next() {
                Some(short) if !short.is_empty() => short.to_string(),
                _ => "Null".to_string(),
            };
            ComponentRow {
                index,
                type_name: type_name.to_string(),
                short_name,
                enabled: components.is_enabled(index).unwrap_or(false),
            }
        })
        .collect()
}
