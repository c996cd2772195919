//! Project documents.
//!
//! A project is the top-level container that ties together recordings,
//! clip tracks, and effects. Hosts load and save it as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::effect::Effect;
use crate::ids::new_project_id;
use crate::recording::Recording;
use crate::track::{Track, TrackKind};
use crate::Millis;

/// Current document schema version.
pub const SCHEMA_VERSION: &str = "2.0";

/// The in-memory project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Schema version.
    pub version: String,

    /// Unique project identifier.
    pub id: String,

    /// Human-readable project name.
    pub name: String,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,

    /// Last modified timestamp (RFC 3339).
    pub modified_at: String,

    /// Timeline settings.
    #[serde(default)]
    pub settings: TimelineSettings,

    /// Media sources referenced by clips.
    #[serde(default)]
    pub recordings: Vec<Recording>,

    /// Clip tracks.
    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Effects layered over the timeline.
    #[serde(default)]
    pub effects: Vec<Effect>,

    /// Timeline length: the latest clip end across all tracks.
    #[serde(default)]
    pub duration_ms: Millis,
}

/// Timeline-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Output frame rate.
    pub fps: u32,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

/// Position of a clip inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipLocation {
    pub track_index: usize,
    pub clip_index: usize,
}

impl ProjectDocument {
    /// Create an empty project with video, audio, and webcam tracks.
    pub fn new(name: impl Into<String>, fps: u32) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: SCHEMA_VERSION.to_string(),
            id: new_project_id(),
            name: name.into(),
            created_at: now.clone(),
            modified_at: now,
            settings: TimelineSettings { fps },
            recordings: vec![],
            tracks: vec![
                Track::new(TrackKind::Video),
                Track::new(TrackKind::Audio),
                Track::new(TrackKind::Webcam),
            ],
            effects: vec![],
            duration_ms: 0.0,
        }
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ProjectError::ParseError { path, source: e })
    }

    /// Save the document as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ProjectError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| ProjectError::IoError { path, source: e })
    }

    pub fn recording(&self, recording_id: &str) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.id == recording_id)
    }

    pub fn add_recording(&mut self, recording: Recording) {
        if self.recording(&recording.id).is_none() {
            self.recordings.push(recording);
        }
    }

    /// First track of the given kind.
    pub fn track(&self, kind: TrackKind) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    /// First track of the given kind, mutably.
    pub fn track_mut(&mut self, kind: TrackKind) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.kind == kind)
    }

    /// Index of the first track of the given kind, creating it when absent.
    pub fn ensure_track(&mut self, kind: TrackKind) -> usize {
        match self.tracks.iter().position(|t| t.kind == kind) {
            Some(index) => index,
            None => {
                self.tracks.push(Track::new(kind));
                self.tracks.len() - 1
            }
        }
    }

    /// Locate a clip by id across all tracks.
    pub fn locate_clip(&self, clip_id: &str) -> Option<ClipLocation> {
        self.tracks
            .iter()
            .enumerate()
            .find_map(|(track_index, track)| {
                track.index_of(clip_id).map(|clip_index| ClipLocation {
                    track_index,
                    clip_index,
                })
            })
    }

    pub fn clip(&self, clip_id: &str) -> Option<&Clip> {
        self.locate_clip(clip_id)
            .map(|loc| &self.tracks[loc.track_index].clips[loc.clip_index])
    }

    pub fn contains_clip(&self, clip_id: &str) -> bool {
        self.locate_clip(clip_id).is_some()
    }

    /// Every clip of the given track kind.
    pub fn clips_of_kind(&self, kind: TrackKind) -> impl Iterator<Item = &Clip> {
        self.tracks
            .iter()
            .filter(move |t| t.kind == kind)
            .flat_map(|t| t.clips.iter())
    }

    pub fn effect(&self, effect_id: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == effect_id)
    }

    pub fn effect_mut(&mut self, effect_id: &str) -> Option<&mut Effect> {
        self.effects.iter_mut().find(|e| e.id == effect_id)
    }

    /// Total number of clips across tracks.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }
}

/// Errors that can occur when loading or saving documents.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectData;
    use crate::region::Region;

    fn sample() -> ProjectDocument {
        let mut doc = ProjectDocument::new("Demo", 60);
        doc.add_recording(Recording::new("rec-1", 10_000.0));
        let video = doc.ensure_track(TrackKind::Video);
        doc.tracks[video].clips.push(Clip::with_id("a", "rec-1", 0.0, 4000.0));
        doc.tracks[video]
            .clips
            .push(Clip::with_id("b", "rec-1", 4000.0, 10_000.0).starting_at(4000.0));
        doc.effects
            .push(Effect::crop("a", Region::new(0.1, 0.1, 0.5, 0.5), 0.0, 4000.0));
        doc
    }

    #[test]
    fn test_new_project_has_three_tracks() {
        let doc = ProjectDocument::new("Test", 30);
        assert_eq!(doc.tracks.len(), 3);
        assert_eq!(doc.settings.fps, 30);
        assert_eq!(doc.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_locate_clip() {
        let doc = sample();
        let loc = doc.locate_clip("b").unwrap();
        assert_eq!(loc.clip_index, 1);
        assert_eq!(doc.tracks[loc.track_index].kind, TrackKind::Video);
        assert!(doc.clip("zzz").is_none());
        assert_eq!(doc.clip_count(), 2);
    }

    #[test]
    fn test_add_recording_is_idempotent() {
        let mut doc = sample();
        doc.add_recording(Recording::new("rec-1", 1.0));
        assert_eq!(doc.recordings.len(), 1);
        assert!((doc.recordings[0].duration_ms - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("recut_test_project_doc");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("project.json");

        let doc = sample();
        doc.save(&path).unwrap();
        let loaded = ProjectDocument::load(&path).unwrap();
        assert_eq!(loaded, doc);
        assert!(matches!(loaded.effects[0].data, EffectData::Crop(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = ProjectDocument::load("/nonexistent/recut/project.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/recut/project.json"));
    }

    #[test]
    fn test_minimal_legacy_document_defaults() {
        let raw = r#"{"version":"1.0","id":"p","name":"Old",
            "created_at":"2024-01-01T00:00:00Z","modified_at":"2024-01-01T00:00:00Z"}"#;
        let doc: ProjectDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.settings.fps, 60);
        assert!(doc.tracks.is_empty());
        assert!(doc.effects.is_empty());
    }
}
