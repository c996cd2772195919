//! CLI command implementations.

pub mod edit;
pub mod info;
pub mod keystrokes;
pub mod speed_up;
pub mod validate;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use recut_common::{AppConfig, RecutError, RecutResult};
use recut_project_model::event::parse_keyboard_events;
use recut_project_model::{ProjectDocument, RecordingMetadata};
use recut_timeline_core::services::MetadataSource;
use recut_timeline_core::{SpeedUpKind, TimelineConfig, TimelineEditor};

use crate::EditArgs;

/// Speed-up kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpeedUpKindArg {
    Typing,
    Idle,
}

impl From<SpeedUpKindArg> for SpeedUpKind {
    fn from(kind: SpeedUpKindArg) -> Self {
        match kind {
            SpeedUpKindArg::Typing => SpeedUpKind::Typing,
            SpeedUpKindArg::Idle => SpeedUpKind::Idle,
        }
    }
}

/// Parse a `RECORDING_ID=PATH` pair.
pub fn parse_metadata_arg(raw: &str) -> Result<(String, PathBuf), String> {
    let (recording_id, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected RECORDING_ID=PATH, got '{raw}'"))?;
    if recording_id.is_empty() || path.is_empty() {
        return Err(format!("expected RECORDING_ID=PATH, got '{raw}'"));
    }
    Ok((recording_id.to_string(), PathBuf::from(path)))
}

/// Keyboard captures stored as JSONL files, one per recording.
pub struct JsonlMetadataSource {
    paths: HashMap<String, PathBuf>,
}

impl JsonlMetadataSource {
    pub fn new(pairs: &[(String, PathBuf)]) -> Self {
        Self {
            paths: pairs.iter().cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl MetadataSource for JsonlMetadataSource {
    fn load_metadata(&self, recording_id: &str) -> RecutResult<RecordingMetadata> {
        let path = self
            .paths
            .get(recording_id)
            .ok_or_else(|| RecutError::metadata(recording_id, "no keyboard capture given"))?;
        if !path.exists() {
            return Err(RecutError::FileNotFound { path: path.clone() });
        }
        let content = std::fs::read_to_string(path)?;
        let events = parse_keyboard_events(&content)
            .map_err(|e| RecutError::metadata(recording_id, format!("{}: {e}", path.display())))?;
        tracing::debug!(%recording_id, events = events.len(), "Loaded keyboard capture");
        Ok(RecordingMetadata::with_keyboard_events(events))
    }
}

/// Load a project and wrap it in an editor.
///
/// When keyboard captures are given, keystroke overlays are rebuilt from
/// them right away.
pub fn open_editor(config: &AppConfig, args: &EditArgs) -> anyhow::Result<TimelineEditor> {
    let document = load_project(&args.project)?;
    let mut editor = TimelineEditor::new(document, TimelineConfig::from(config));
    editor.synchronize();

    let source = JsonlMetadataSource::new(&args.metadata);
    if !source.is_empty() {
        let outcome = editor.refresh_metadata(&source);
        tracing::info!(?outcome, "Keyboard metadata applied");
    }
    Ok(editor)
}

pub fn load_project(path: &Path) -> anyhow::Result<ProjectDocument> {
    ProjectDocument::load(path).with_context(|| format!("Failed to load project {}", path.display()))
}

/// Save the edited document unless this is a dry run.
pub fn save_project(editor: &TimelineEditor, args: &EditArgs) -> anyhow::Result<()> {
    if args.dry_run {
        println!("Dry run: nothing saved");
        return Ok(());
    }
    let target = args.output.as_deref().unwrap_or(&args.project);
    editor
        .document()
        .save(target)
        .with_context(|| format!("Failed to save project {}", target.display()))?;
    println!("Saved: {}", target.display());
    Ok(())
}

/// Format timeline milliseconds as `m:ss.mmm`.
pub fn format_ms(ms: f64) -> String {
    let total = ms.max(0.0).round() as u64;
    format!("{}:{:02}.{:03}", total / 60_000, (total / 1000) % 60, total % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_arg() {
        let (id, path) = parse_metadata_arg("rec-1=captures/keys.jsonl").unwrap();
        assert_eq!(id, "rec-1");
        assert_eq!(path, PathBuf::from("captures/keys.jsonl"));

        assert!(parse_metadata_arg("rec-1").is_err());
        assert!(parse_metadata_arg("=keys.jsonl").is_err());
        assert!(parse_metadata_arg("rec-1=").is_err());
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0.0), "0:00.000");
        assert_eq!(format_ms(27_000.0), "0:27.000");
        assert_eq!(format_ms(61_250.4), "1:01.250");
    }

    #[test]
    fn test_missing_capture_is_a_metadata_error() {
        let source = JsonlMetadataSource::new(&[]);
        let err = source.load_metadata("rec-1").unwrap_err();
        assert!(matches!(err, RecutError::Metadata { .. }));
    }
}
