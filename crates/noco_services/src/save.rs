//! Scene save files
//!
//! A save is the list of scene nodes (with their metadata, and so their
//! component records) written as JSON.

use crate::scene::SceneNode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("save file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("save file {path} has version {found}, expected {expected}")]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSave {
    pub version: u32,
    pub nodes: Vec<SceneNode>,
}

impl SceneSave {
    pub fn new(nodes: Vec<SceneNode>) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            nodes,
        }
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| SaveError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), nodes = self.nodes.len(), "scene saved");
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let save: SceneSave = serde_json::from_str(&text).map_err(|source| SaveError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        if save.version != SAVE_FORMAT_VERSION {
            return Err(SaveError::Version {
                path: path.to_path_buf(),
                found: save.version,
                expected: SAVE_FORMAT_VERSION,
            });
        }
        tracing::info!(path = %path.display(), nodes = save.nodes.len(), "scene loaded");
        Ok(save)
    }
}
