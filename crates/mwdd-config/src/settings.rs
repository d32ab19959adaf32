//! Global settings
//!
//! Located at `~/.mwcli/config.json`

use crate::{ConfigError, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global mwdd settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Development mode for the cli itself ("" or "mwdd")
    pub dev_mode: String,
}

impl Settings {
    /// Path of the settings file
    pub fn path() -> Result<PathBuf> {
        let dirs = UserDirs::new().ok_or(ConfigError::NoHomeDir)?;
        Ok(dirs.home_dir().join(".mwcli").join("config.json"))
    }

    /// Load settings from disk, defaults when the file does not exist
    pub fn load_from_disk() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            tracing::debug!("Settings file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::JsonParseError {
            path: path.clone(),
            source,
        })
    }

    /// Raw JSON rendering for `config show`
    pub fn pretty_print(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_render() {
        let settings = Settings::default();
        let rendered = settings.pretty_print().unwrap();
        assert!(rendered.contains("dev_mode"));
    }

    #[test]
    fn test_settings_parse_roundtrip() {
        let parsed: Settings = serde_json::from_str(r#"{"dev_mode":"mwdd"}"#).unwrap();
        assert_eq!(parsed.dev_mode, "mwdd");
        let rendered = parsed.pretty_print().unwrap();
        let reparsed: Settings = serde_json::from_str(&rendered).unwrap();
        assert_eq!(reparsed.dev_mode, "mwdd");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let parsed: Settings =
            serde_json::from_str(r#"{"dev_mode":"","future_setting":true}"#).unwrap();
        assert_eq!(parsed.dev_mode, "");
    }
}
