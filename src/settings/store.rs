//! JSON file backed settings store

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, info, warn};

use super::AppSettings;

/// Reads and writes the settings record at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load saved settings. Missing or unreadable files yield the defaults.
    pub async fn load(&self) -> AppSettings {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No settings file at {}, using defaults", self.path.display());
                return AppSettings::default();
            }
            Err(e) => {
                warn!("Failed to read settings from {}: {}", self.path.display(), e);
                return AppSettings::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => {
                debug!("Loaded settings from {}", self.path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring malformed settings in {}: {}", self.path.display(), e);
                AppSettings::default()
            }
        }
    }

    /// Persist the full settings record.
    pub async fn save(&self, settings: &AppSettings) -> Result<(), String> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }

        fs::write(&self.path, json)
            .await
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))?;

        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
