//! Recordings: the immutable media sources clips point into.

use serde::{Deserialize, Serialize};

use crate::event::KeyboardEvent;
use crate::Millis;

/// A media source with a fixed duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Unique recording identifier.
    pub id: String,

    /// Total length of the recording in source milliseconds.
    pub duration_ms: Millis,

    /// Relative path from the project root to the media file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Recording {
    pub fn new(id: impl Into<String>, duration_ms: Millis) -> Self {
        Self {
            id: id.into(),
            duration_ms,
            path: None,
        }
    }
}

/// Per-recording metadata loaded lazily by the host's storage layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// Keyboard events in source time.
    #[serde(default)]
    pub keyboard_events: Vec<KeyboardEvent>,
}

impl RecordingMetadata {
    pub fn with_keyboard_events(keyboard_events: Vec<KeyboardEvent>) -> Self {
        Self { keyboard_events }
    }

    /// Source timestamps of every valid key press, sorted ascending.
    pub fn key_press_times(&self) -> Vec<Millis> {
        let mut times: Vec<Millis> = self
            .keyboard_events
            .iter()
            .filter(|e| e.is_press())
            .map(|e| e.timestamp_ms)
            .collect();
        times.sort_by(f64::total_cmp);
        times
    }

    pub fn has_keyboard_events(&self) -> bool {
        self.keyboard_events.iter().any(KeyboardEvent::is_press)
    }
}
