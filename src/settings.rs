//! Host settings
//!
//! Read from a JSON file named by `PLANE_WAR_SETTINGS`; every field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Viewport;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "PLANE_WAR_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play area width in device-independent units
    pub viewport_width: f32,
    /// Play area height in device-independent units
    pub viewport_height: f32,
    /// Fixed run seed; random when absent
    pub seed: Option<u64>,
    /// Let the headless host steer the player
    pub autopilot: bool,
    /// Frames the headless host runs before giving up
    pub max_frames: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            seed: None,
            autopilot: true,
            max_frames: 60 * 60 * 5,
        }
    }
}

impl Settings {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.viewport().is_playable() {
            return Err(SettingsError::Invalid(format!(
                "viewport must be finite and fit the player craft, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from the file named by `PLANE_WAR_SETTINGS`, falling back to defaults
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("{} - using default settings", e);
                Self::default()
            }
        }
    }
}
