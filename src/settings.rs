//! Player preferences
//!
//! Persisted as a small JSON file next to the leaderboard. Anything missing
//! or unreadable falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Identity (sent with score reports) ===
    pub display_name: String,
    /// Id from whatever account system the host uses, if any
    pub external_user_id: Option<String>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: "Player".to_string(),
            external_user_id: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Id the leaderboard keys on: the external id, else the display name
    pub fn user_key(&self) -> &str {
        self.external_user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(self.display_name.as_str())
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("Using default settings");
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring corrupt settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            display_name: "Crust".to_string(),
            external_user_id: Some("u-42".to_string()),
            master_volume: 0.3,
            sfx_volume: 0.9,
            muted: true,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_missing_or_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(Settings::load(&missing), Settings::default());

        let corrupt = dir.path().join("bad.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        assert_eq!(Settings::load(&corrupt), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"muted": true}"#).unwrap();
        let settings = Settings::load(&path);
        assert!(settings.muted);
        assert_eq!(settings.display_name, "Player");
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_user_key_prefers_external_id() {
        let mut settings = Settings::default();
        assert_eq!(settings.user_key(), "Player");
        settings.external_user_id = Some(String::new());
        assert_eq!(settings.user_key(), "Player");
        settings.external_user_id = Some("abc".to_string());
        assert_eq!(settings.user_key(), "abc");
    }

    #[test]
    fn test_save_to_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/settings.json");
        assert!(matches!(
            Settings::default().save(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
