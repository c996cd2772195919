//! Clips: trimmed, rate-adjusted windows onto a recording.

use serde::{Deserialize, Serialize};

use crate::ids::new_clip_id;
use crate::Millis;

fn default_playback_rate() -> f64 {
    1.0
}

/// A window `[source_in, source_out)` of a recording placed on a track.
///
/// `start_time` and `duration` are timeline milliseconds and are derived:
/// the track's array order decides `start_time`, and `duration` is
/// `(source_out - source_in) / playback_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip identifier.
    pub id: String,

    /// Recording this clip plays from.
    pub recording_id: String,

    /// Timeline position of the first frame.
    pub start_time: Millis,

    /// Timeline length.
    pub duration: Millis,

    /// First source millisecond played.
    pub source_in: Millis,

    /// Source millisecond where playback stops.
    pub source_out: Millis,

    /// Playback speed multiplier (1.0 = real time).
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f64,

    /// Trimming may never move `source_in` below this bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_source_in: Option<Millis>,

    /// Trimming may never move `source_out` above this bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_source_out: Option<Millis>,

    /// Fade-in length at the clip's start (timeline ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_fade_ms: Option<Millis>,

    /// Fade-out length at the clip's end (timeline ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outro_fade_ms: Option<Millis>,

    /// A typing speed-up already produced this clip.
    #[serde(default)]
    pub typing_speed_applied: bool,

    /// An idle speed-up already produced this clip.
    #[serde(default)]
    pub idle_speed_applied: bool,
}

impl Clip {
    /// Create a real-time clip over `[source_in, source_out)` with a fresh id.
    pub fn new(recording_id: impl Into<String>, source_in: Millis, source_out: Millis) -> Self {
        Self::with_id(new_clip_id(), recording_id, source_in, source_out)
    }

    /// Create a real-time clip with an explicit id.
    pub fn with_id(
        id: impl Into<String>,
        recording_id: impl Into<String>,
        source_in: Millis,
        source_out: Millis,
    ) -> Self {
        Self {
            id: id.into(),
            recording_id: recording_id.into(),
            start_time: 0.0,
            duration: source_out - source_in,
            source_in,
            source_out,
            playback_rate: 1.0,
            locked_source_in: None,
            locked_source_out: None,
            intro_fade_ms: None,
            outro_fade_ms: None,
            typing_speed_applied: false,
            idle_speed_applied: false,
        }
    }

    /// Set the playback rate and the matching duration.
    pub fn at_rate(mut self, playback_rate: f64) -> Self {
        self.playback_rate = playback_rate;
        self.duration = (self.source_out - self.source_in) / playback_rate;
        self
    }

    /// Set the timeline start.
    pub fn starting_at(mut self, start_time: Millis) -> Self {
        self.start_time = start_time;
        self
    }

    /// Set intro and outro fades.
    pub fn with_fades(mut self, intro_ms: Option<Millis>, outro_ms: Option<Millis>) -> Self {
        self.intro_fade_ms = intro_ms;
        self.outro_fade_ms = outro_ms;
        self
    }

    /// Set the hard source bounds trimming may not cross.
    pub fn with_locked_bounds(mut self, locked_in: Option<Millis>, locked_out: Option<Millis>) -> Self {
        self.locked_source_in = locked_in;
        self.locked_source_out = locked_out;
        self
    }

    /// Timeline end (exclusive).
    pub fn end_time(&self) -> Millis {
        self.start_time + self.duration
    }

    /// Length of the source window.
    pub fn source_duration(&self) -> Millis {
        self.source_out - self.source_in
    }

    /// Whether either speed-up flag is set.
    pub fn has_speed_up(&self) -> bool {
        self.typing_speed_applied || self.idle_speed_applied
    }

    /// Overlap (timeline ms) between this clip and `[start, end)`.
    pub fn overlap_with(&self, start: Millis, end: Millis) -> Millis {
        (self.end_time().min(end) - self.start_time.max(start)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clip_is_real_time() {
        let clip = Clip::new("rec-1", 1000.0, 4000.0);
        assert!((clip.duration - 3000.0).abs() < 1e-9);
        assert!((clip.playback_rate - 1.0).abs() < 1e-9);
        assert!(clip.id.starts_with("clip-"));
    }

    #[test]
    fn test_at_rate_recomputes_duration() {
        let clip = Clip::with_id("c", "rec", 0.0, 4000.0).at_rate(2.0);
        assert!((clip.duration - 2000.0).abs() < 1e-9);
        assert!((clip.source_duration() - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap() {
        let clip = Clip::with_id("c", "rec", 0.0, 1000.0).starting_at(500.0);
        assert!((clip.overlap_with(0.0, 1000.0) - 500.0).abs() < 1e-9);
        assert!((clip.overlap_with(2000.0, 3000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_legacy_clip_defaults_rate_and_flags() {
        let raw = r#"{
            "id":"c1","recording_id":"r1","start_time":0,"duration":500,
            "source_in":0,"source_out":500
        }"#;
        let clip: Clip = serde_json::from_str(raw).unwrap();
        assert!((clip.playback_rate - 1.0).abs() < 1e-9);
        assert!(!clip.has_speed_up());
        assert_eq!(clip.locked_source_in, None);
    }
}
