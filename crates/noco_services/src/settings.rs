//! Settings management

use noco_core::ControllerSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub controller: ControllerSettings,
    pub logging: LoggingSettings,
    pub save: SaveSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Fallback filter when `RUST_LOG` is unset.
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    pub path: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("scene.json"),
        }
    }
}

impl Settings {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noco_core::{ExecutionContext, RestoreMode};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("noco_settings_{}_{name}.json", std::process::id()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load(temp_path("missing")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"controller":{"restore_hooks":"suppress"}}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.controller.restore_hooks, RestoreMode::Suppress);
        assert_eq!(settings.controller.context, ExecutionContext::Live);
        assert_eq!(settings.save.path, PathBuf::from("scene.json"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("round");
        let mut settings = Settings::default();
        settings.controller = ControllerSettings::inspection();
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn invalid_json_is_an_error() {
        let path = temp_path("invalid");
        fs::write(&path, "{").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
        fs::remove_file(path).unwrap();
    }
}
