//! Per-node metadata and the component records stored in it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key under which a node keeps its component records.
pub const COMPONENTS_META_KEY: &str = "node_components";

/// Loosely typed metadata value, like an engine variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetaValue {
    Nil,
    Bool(bool),
    Int(i64),
    Text(String),
    StringArray(Vec<String>),
}

pub type Metadata = BTreeMap<String, MetaValue>;

/// Store `records` under [`COMPONENTS_META_KEY`]. An empty array removes the key.
pub fn save_components_to_meta(meta: &mut Metadata, records: Vec<String>) {
    if records.is_empty() {
        meta.remove(COMPONENTS_META_KEY);
    } else {
        meta.insert(COMPONENTS_META_KEY.to_string(), MetaValue::StringArray(records));
    }
}

/// Records stored under [`COMPONENTS_META_KEY`], if any.
///
/// A value of any other shape is reported as corrupted and treated as absent.
pub fn load_components_from_meta(meta: &Metadata, node: &str) -> Option<Vec<String>> {
    match meta.get(COMPONENTS_META_KEY)? {
        MetaValue::Nil => None,
        MetaValue::StringArray(records) => Some(records.clone()),
        other => {
            tracing::error!(node, found = ?other, "components data is corrupted");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_save_removes_key() {
        let mut meta = Metadata::new();
        save_components_to_meta(&mut meta, vec!["a|{}".into()]);
        assert_eq!(
            load_components_from_meta(&meta, "n"),
            Some(vec!["a|{}".to_string()])
        );

        save_components_to_meta(&mut meta, Vec::new());
        assert!(!meta.contains_key(COMPONENTS_META_KEY));
        assert_eq!(load_components_from_meta(&meta, "n"), None);
    }

    #[test]
    fn wrong_shape_reads_as_absent() {
        let mut meta = Metadata::new();
        meta.insert(COMPONENTS_META_KEY.into(), MetaValue::Int(3));
        assert_eq!(load_components_from_meta(&meta, "n"), None);

        meta.insert(COMPONENTS_META_KEY.into(), MetaValue::Nil);
        assert_eq!(load_components_from_meta(&meta, "n"), None);
    }
}
