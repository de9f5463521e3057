//! Scene nodes that can host a components controller

use crate::metadata::{load_components_from_meta, save_components_to_meta, MetaValue, Metadata};
use noco_core::HostAdapter;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Node,
    Node3D,
    Control,
}

/// Persisted state of one node: identity plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub meta: Metadata,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            meta: Metadata::new(),
        }
    }

    pub fn into_ref(self) -> Rc<RefCell<SceneNode>> {
        Rc::new(RefCell::new(self))
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: MetaValue) {
        self.meta.insert(key.into(), value);
    }

    pub fn get_meta(&self, key: &str) -> Option<&MetaValue> {
        self.meta.get(key)
    }
}

impl HostAdapter for SceneNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn persist(&mut self, records: Vec<String>) {
        save_components_to_meta(&mut self.meta, records);
    }

    fn retrieve(&self) -> Option<Vec<String>> {
        load_components_from_meta(&self.meta, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::COMPONENTS_META_KEY;

    #[test]
    fn persist_writes_metadata() {
        let mut node = SceneNode::new("Cube", NodeKind::Node3D);
        node.persist(vec!["a|{}".into(), "b|{}".into()]);
        assert_eq!(
            node.get_meta(COMPONENTS_META_KEY),
            Some(&MetaValue::StringArray(vec!["a|{}".into(), "b|{}".into()]))
        );
        assert_eq!(node.retrieve().map(|r| r.len()), Some(2));
    }
}
