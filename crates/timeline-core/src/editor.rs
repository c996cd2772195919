//! The timeline editor: owns a project document and runs every edit
//! through the same pipeline.
//!
//! Edit intent → [`EditCommand::execute`] (locate, mutate, reflow, crop
//! sync, duration) → effect hygiene → keystroke rebuild → modification
//! stamp → history.

use recut_common::{EditClock, SystemClock};
use recut_project_model::{Clip, Millis, ProjectDocument, RecordingMetadata, TrackKind};

use crate::command::{AppliedEdit, EditCommand};
use crate::config::TimelineConfig;
use crate::error::{EditError, EditResult};
use crate::history::EditHistory;
use crate::reflow::{project_duration, reflow_all};
use crate::services::{EffectGenerator, MetadataCache, MetadataSource};
use crate::speed_up::{SpeedUpKind, SpeedUpPeriod};
use crate::sync::{
    drop_invalid_effects, rebuild_keystroke_effects, sync_crop_effects, CropSyncReport,
    RebuildOutcome,
};

/// What a full synchronization pass changed.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub durations_corrected: usize,
    pub starts_moved: usize,
    pub invalid_effects_dropped: usize,
    pub crops: CropSyncReport,
    pub keystrokes: RebuildOutcome,
}

/// Single owner of a project document.
pub struct TimelineEditor<C: EditClock = SystemClock> {
    document: ProjectDocument,
    metadata: MetadataCache,
    config: TimelineConfig,
    history: EditHistory,
    clock: C,
}

impl TimelineEditor<SystemClock> {
    pub fn new(document: ProjectDocument, config: TimelineConfig) -> Self {
        Self::with_clock(document, config, SystemClock)
    }
}

impl<C: EditClock> TimelineEditor<C> {
    pub fn with_clock(document: ProjectDocument, config: TimelineConfig, clock: C) -> Self {
        Self {
            document,
            metadata: MetadataCache::new(),
            config,
            history: EditHistory::default(),
            clock,
        }
    }

    pub fn document(&self) -> &ProjectDocument {
        &self.document
    }

    pub fn into_document(self) -> ProjectDocument {
        self.document
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn metadata(&self) -> &MetadataCache {
        &self.metadata
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Run a command, derive dependent effects, and record it for undo.
    pub fn apply(&mut self, command: EditCommand) -> EditResult<AppliedEdit> {
        let applied = command.execute(&mut self.document, &self.config)?;
        if applied.is_noop() {
            tracing::debug!(label = applied.label(), "Edit changed nothing; not recorded");
            return Ok(applied);
        }
        self.after_edit();
        self.history.push(applied.clone());
        Ok(applied)
    }

    /// Undo the most recent edit. Returns its label, or `None` when there
    /// is nothing to undo.
    pub fn undo(&mut self) -> EditResult<Option<&'static str>> {
        let Some(edit) = self.history.pop_undo() else {
            return Ok(None);
        };
        if let Err(err) = edit.undo(&mut self.document) {
            tracing::warn!(label = edit.label(), %err, "Undo failed");
            self.history.push_redone(edit);
            return Err(err);
        }
        self.after_edit();
        let label = edit.label();
        self.history.push_redo(edit);
        Ok(Some(label))
    }

    /// Re-execute the most recently undone edit.
    pub fn redo(&mut self) -> EditResult<Option<&'static str>> {
        let Some(edit) = self.history.pop_redo() else {
            return Ok(None);
        };
        match edit.command.execute(&mut self.document, &self.config) {
            Ok(redone) => {
                self.after_edit();
                let label = redone.label();
                self.history.push_redone(redone);
                Ok(Some(label))
            }
            Err(err) => {
                tracing::warn!(label = edit.label(), %err, "Redo failed");
                self.history.push_redo(edit);
                Err(err)
            }
        }
    }

    pub fn split(&mut self, clip_id: &str, offset_ms: Millis) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::Split {
            clip_id: clip_id.to_string(),
            offset_ms,
            new_ids: None,
        })
    }

    pub fn trim_start(&mut self, clip_id: &str, new_start_ms: Millis) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::TrimStart {
            clip_id: clip_id.to_string(),
            new_start_ms,
        })
    }

    pub fn trim_end(&mut self, clip_id: &str, new_end_ms: Millis) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::TrimEnd {
            clip_id: clip_id.to_string(),
            new_end_ms,
        })
    }

    pub fn duplicate(&mut self, clip_id: &str) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::Duplicate {
            clip_id: clip_id.to_string(),
            new_id: None,
        })
    }

    pub fn delete(&mut self, clip_id: &str) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::Delete {
            clip_id: clip_id.to_string(),
        })
    }

    pub fn insert(&mut self, kind: TrackKind, clip: Clip, index: usize) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::Insert { kind, clip, index })
    }

    pub fn move_clip(&mut self, clip_id: &str, to_index: usize) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::Move {
            clip_id: clip_id.to_string(),
            to_index,
        })
    }

    pub fn set_playback_rate(&mut self, clip_id: &str, rate: f64) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::SetPlaybackRate {
            clip_id: clip_id.to_string(),
            rate,
        })
    }

    pub fn speed_up(
        &mut self,
        clip_id: &str,
        periods: Vec<SpeedUpPeriod>,
        kinds: Vec<SpeedUpKind>,
    ) -> EditResult<AppliedEdit> {
        self.apply(EditCommand::SpeedUp {
            clip_id: clip_id.to_string(),
            periods,
            kinds,
            new_ids: None,
        })
    }

    /// Hand over loaded metadata and rebuild keystroke overlays.
    pub fn load_metadata(&mut self, recording_id: &str, metadata: RecordingMetadata) -> RebuildOutcome {
        self.metadata.insert(recording_id, metadata);
        let outcome = self.rebuild_keystrokes();
        if matches!(outcome, RebuildOutcome::Rebuilt { .. }) {
            self.touch();
        }
        outcome
    }

    /// Load metadata for every recording not yet cached. Failures are
    /// logged and leave the recording unloaded.
    pub fn refresh_metadata(&mut self, source: &dyn MetadataSource) -> RebuildOutcome {
        let pending: Vec<String> = self
            .document
            .recordings
            .iter()
            .map(|r| r.id.clone())
            .filter(|id| !self.metadata.is_loaded(id))
            .collect();

        for recording_id in pending {
            match source.load_metadata(&recording_id) {
                Ok(metadata) => self.metadata.insert(&recording_id, metadata),
                Err(err) => tracing::warn!(%recording_id, %err, "Failed to load recording metadata"),
            }
        }

        let outcome = self.rebuild_keystrokes();
        if matches!(outcome, RebuildOutcome::Rebuilt { .. }) {
            self.touch();
        }
        outcome
    }

    /// Heal a freshly loaded document: reflow every track, drop malformed
    /// effects, re-bind crops, and rebuild keystrokes.
    pub fn synchronize(&mut self) -> SyncReport {
        let reflow = reflow_all(&mut self.document);
        let dropped = drop_invalid_effects(&mut self.document);
        self.document.duration_ms = project_duration(&self.document);
        let crops = sync_crop_effects(&mut self.document);
        let keystrokes = self.rebuild_keystrokes();

        let report = SyncReport {
            durations_corrected: reflow.durations_corrected,
            starts_moved: reflow.starts_moved,
            invalid_effects_dropped: dropped.len(),
            crops,
            keystrokes,
        };
        tracing::info!(
            durations_corrected = report.durations_corrected,
            starts_moved = report.starts_moved,
            invalid_effects_dropped = report.invalid_effects_dropped,
            crops_removed = report.crops.removed.len(),
            "Project synchronized"
        );
        report
    }

    /// Ask `generator` for speed-ups on every video clip of a loaded
    /// recording and apply them. Clips already sped up for every requested
    /// kind are skipped.
    pub fn apply_suggested_speed_ups(
        &mut self,
        generator: &dyn EffectGenerator,
        kinds: &[SpeedUpKind],
    ) -> EditResult<Vec<AppliedEdit>> {
        let candidates: Vec<(String, String)> = self
            .document
            .clips_of_kind(TrackKind::Video)
            .filter(|clip| !already_sped_up(clip, kinds))
            .map(|clip| (clip.id.clone(), clip.recording_id.clone()))
            .collect();

        let mut applied = vec![];
        for (clip_id, recording_id) in candidates {
            let (Some(recording), Some(metadata)) = (
                self.document.recording(&recording_id),
                self.metadata.get(&recording_id),
            ) else {
                tracing::debug!(%clip_id, %recording_id, "No metadata; speed-up skipped");
                continue;
            };

            let periods = match generator.suggest_speed_ups(recording, metadata) {
                Ok(periods) => periods,
                Err(err) => {
                    tracing::warn!(%recording_id, %err, "Speed-up suggestion failed");
                    continue;
                }
            };

            match self.speed_up(&clip_id, periods, kinds.to_vec()) {
                Ok(edit) => applied.push(edit),
                Err(EditError::NothingToApply { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(applied)
    }

    fn rebuild_keystrokes(&mut self) -> RebuildOutcome {
        rebuild_keystroke_effects(&mut self.document, &self.metadata, &self.config.keystrokes)
    }

    fn touch(&mut self) {
        self.document.modified_at = self.clock.stamp();
    }

    fn after_edit(&mut self) {
        drop_invalid_effects(&mut self.document);
        self.rebuild_keystrokes();
        self.touch();
    }
}

fn already_sped_up(clip: &Clip, kinds: &[SpeedUpKind]) -> bool {
    !kinds.is_empty()
        && kinds.iter().all(|kind| match kind {
            SpeedUpKind::Typing => clip.typing_speed_applied,
            SpeedUpKind::Idle => clip.idle_speed_applied,
        })
}
