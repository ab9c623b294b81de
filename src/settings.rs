//! Player settings and preferences
//!
//! Stored as JSON. A missing file means defaults; a malformed one is an error
//! so the caller can decide whether to overwrite it.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CANVAS_SIZE, DEFAULT_MAX_HINTS};
use crate::error::Result;
use crate::sim::InitOptions;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dark_mode: bool,
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    /// Whether new puzzles allow piece rotation
    pub rotation_enabled_by_default: bool,
    pub hints_per_puzzle: u32,
    /// Milliseconds between progress autosaves
    pub auto_save_interval_ms: u64,
    /// Canvas edge length for new puzzles
    pub canvas_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            sound_enabled: true,
            haptics_enabled: true,
            rotation_enabled_by_default: true,
            hints_per_puzzle: DEFAULT_MAX_HINTS,
            auto_save_interval_ms: 5_000,
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, defaults if it doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                log::warn!("Failed to read settings {}: {}", path.display(), err);
                return Err(err.into());
            }
        };
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Starting options for a new puzzle under these settings
    pub fn init_options(&self, puzzle_id: &str, image_id: &str, seed: u64) -> InitOptions {
        InitOptions {
            puzzle_id: puzzle_id.to_string(),
            image_id: image_id.to_string(),
            canvas_size: self.canvas_size,
            rotation_enabled: self.rotation_enabled_by_default,
            sound_enabled: self.sound_enabled,
            haptics_enabled: self.haptics_enabled,
            max_hints: self.hints_per_puzzle,
            seed,
        }
    }
}
