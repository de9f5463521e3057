use serde::{Deserialize, Serialize};

/// Opaque copy of a controller's record array, captured before an edit so it
/// can be restored later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<String>);

impl Snapshot {
    pub fn records(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_records(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Snapshot {
    fn from(records: Vec<String>) -> Self {
        Self(records)
    }
}
