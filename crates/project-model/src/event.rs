//! Keyboard event types captured alongside a recording.
//!
//! Events are stored in append-only JSONL format, one object per line.
//! Timestamps are source-time milliseconds relative to recording start.

use serde::{Deserialize, Serialize};

use crate::Millis;

/// Key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    #[default]
    Down,
    Up,
}

/// A single recorded keyboard event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    /// Source-time milliseconds since recording start.
    #[serde(rename = "t")]
    pub timestamp_ms: Millis,

    /// Key code (e.g., "KeyA", "Enter", "ShiftLeft").
    pub key: String,

    /// Press or release. Older captures only recorded presses.
    #[serde(default)]
    pub state: KeyState,

    /// Modifier keys held at the time of the event.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

impl KeyboardEvent {
    /// Create a key-press event.
    pub fn down(timestamp_ms: Millis, key: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            key: key.into(),
            state: KeyState::Down,
            modifiers: vec![],
        }
    }

    /// Create a key-release event.
    pub fn up(timestamp_ms: Millis, key: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            key: key.into(),
            state: KeyState::Up,
            modifiers: vec![],
        }
    }

    /// Attach held modifiers.
    pub fn with_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this is a usable press (finite, non-negative timestamp).
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Down && self.timestamp_ms.is_finite() && self.timestamp_ms >= 0.0
    }
}

/// Parse keyboard events from JSONL content (one JSON object per line).
/// Blank lines and `#` header comments are skipped.
pub fn parse_keyboard_events(jsonl: &str) -> Result<Vec<KeyboardEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize keyboard events to JSONL format.
pub fn serialize_keyboard_events(events: &[KeyboardEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
