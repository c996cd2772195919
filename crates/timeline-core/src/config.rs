//! Tuning for the timeline engine.

use recut_common::{AppConfig, KeystrokeTuning};

use crate::time_space::{MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE};

/// Minimum clip length a trim may produce.
pub const MIN_CLIP_DURATION_MS: f64 = 1000.0;

/// Engine parameters, usually derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    /// Shortest clip (timeline ms) a trim may leave.
    pub min_clip_duration_ms: f64,

    /// Slowest allowed playback rate.
    pub min_playback_rate: f64,

    /// Fastest allowed playback rate.
    pub max_playback_rate: f64,

    /// Keystroke clustering parameters.
    pub keystrokes: KeystrokeTuning,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_clip_duration_ms: MIN_CLIP_DURATION_MS,
            min_playback_rate: MIN_PLAYBACK_RATE,
            max_playback_rate: MAX_PLAYBACK_RATE,
            keystrokes: KeystrokeTuning::default(),
        }
    }
}

impl From<&AppConfig> for TimelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            min_clip_duration_ms: config.editor.min_clip_duration_ms,
            min_playback_rate: config.editor.min_playback_rate,
            max_playback_rate: config.editor.max_playback_rate,
            keystrokes: config.keystrokes.clone(),
        }
    }
}

impl TimelineConfig {
    /// Clamp a positive rate into the configured range.
    pub fn clamp_rate(&self, rate: f64) -> f64 {
        rate.clamp(self.min_playback_rate, self.max_playback_rate)
    }
}
