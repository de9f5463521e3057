//! Node Components Services Layer
//!
//! Host-side plumbing around the core: settings, metadata-backed record
//! storage for scene nodes, and scene save files.

pub mod metadata;
pub mod save;
pub mod scene;
pub mod settings;

pub use metadata::{MetaValue, Metadata, COMPONENTS_META_KEY};
pub use save::{SaveError, SceneSave};
pub use scene::{NodeKind, SceneNode};
pub use settings::{Settings, SettingsError};
