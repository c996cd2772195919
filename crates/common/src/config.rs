//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RecutError, RecutResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where project documents are stored.
    pub projects_dir: PathBuf,

    /// Timeline editing defaults.
    #[serde(default)]
    pub editor: EditorDefaults,

    /// Keystroke overlay derivation tuning.
    #[serde(default)]
    pub keystrokes: KeystrokeTuning,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default timeline editing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    /// Project frame rate used when a document does not specify one.
    pub fps: u32,

    /// Shortest clip (timeline ms) a trim may produce.
    pub min_clip_duration_ms: f64,

    /// Slowest playback rate a clip may carry.
    pub min_playback_rate: f64,

    /// Fastest playback rate a clip may carry.
    pub max_playback_rate: f64,
}

/// Parameters for clustering keyboard events into keystroke overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeystrokeTuning {
    /// Largest gap (source ms) between two key presses of one cluster.
    pub max_gap_ms: f64,

    /// Padding (source ms) added before and after every cluster.
    pub padding_ms: f64,

    /// Projected ranges shorter than this (timeline ms) are discarded.
    pub min_duration_ms: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "recut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_dir: dirs_default_projects(),
            editor: EditorDefaults::default(),
            keystrokes: KeystrokeTuning::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            fps: 60,
            min_clip_duration_ms: 1000.0,
            min_playback_rate: 0.0625,
            max_playback_rate: 16.0,
        }
    }
}

impl Default for KeystrokeTuning {
    fn default() -> Self {
        Self {
            max_gap_ms: 2000.0,
            padding_ms: 500.0,
            min_duration_ms: 100.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                    Ok(config) => match config.validate() {
                        Ok(()) => return config,
                        Err(e) => {
                            tracing::warn!("Ignoring invalid config at {:?}: {}", config_path, e);
                        }
                    },
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> RecutResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> RecutResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }

    /// Reject values the timeline core cannot work with.
    pub fn validate(&self) -> RecutResult<()> {
        let editor = &self.editor;
        if editor.fps == 0 {
            return Err(RecutError::config("editor.fps must be positive"));
        }
        if !(editor.min_clip_duration_ms.is_finite() && editor.min_clip_duration_ms > 0.0) {
            return Err(RecutError::config(
                "editor.min_clip_duration_ms must be a positive number",
            ));
        }
        if !(editor.min_playback_rate > 0.0
            && editor.min_playback_rate.is_finite()
            && editor.max_playback_rate.is_finite()
            && editor.min_playback_rate <= editor.max_playback_rate)
        {
            return Err(RecutError::config(
                "editor playback rate range must be positive and ordered",
            ));
        }

        let keys = &self.keystrokes;
        for (name, value) in [
            ("keystrokes.max_gap_ms", keys.max_gap_ms),
            ("keystrokes.padding_ms", keys.padding_ms),
            ("keystrokes.min_duration_ms", keys.min_duration_ms),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(RecutError::config(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("recut").join("config.json")
}

/// Default projects directory.
fn dirs_default_projects() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("recut").join("projects")
}
