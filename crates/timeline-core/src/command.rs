//! Reversible edit commands.
//!
//! An [`EditCommand`] names an edit intent. Executing it produces an
//! [`AppliedEdit`] that carries the exact data needed to invert it (clip
//! snapshots, new ids, removed effects), so undo never re-derives state.
//! The applied command records the ids it generated, so re-executing it
//! after an undo recreates the same clips.

use serde::{Deserialize, Serialize};

use recut_project_model::{Clip, Effect, Millis, ProjectDocument, TrackKind};

use crate::config::TimelineConfig;
use crate::edit::{self, InsertOutcome};
use crate::error::EditResult;
use crate::speed_up::{self, SpeedUpKind, SpeedUpOutcome, SpeedUpPeriod};

/// An edit intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    Split {
        clip_id: String,
        offset_ms: Millis,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_ids: Option<(String, String)>,
    },
    TrimStart {
        clip_id: String,
        new_start_ms: Millis,
    },
    TrimEnd {
        clip_id: String,
        new_end_ms: Millis,
    },
    Duplicate {
        clip_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_id: Option<String>,
    },
    Delete {
        clip_id: String,
    },
    Insert {
        kind: TrackKind,
        clip: Clip,
        index: usize,
    },
    Move {
        clip_id: String,
        to_index: usize,
    },
    SetPlaybackRate {
        clip_id: String,
        rate: f64,
    },
    SpeedUp {
        clip_id: String,
        periods: Vec<SpeedUpPeriod>,
        kinds: Vec<SpeedUpKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_ids: Option<Vec<String>>,
    },
}

impl EditCommand {
    /// Human-readable label for history menus.
    pub fn label(&self) -> &'static str {
        match self {
            EditCommand::Split { .. } => "Split clip",
            EditCommand::TrimStart { .. } => "Trim clip start",
            EditCommand::TrimEnd { .. } => "Trim clip end",
            EditCommand::Duplicate { .. } => "Duplicate clip",
            EditCommand::Delete { .. } => "Delete clip",
            EditCommand::Insert { .. } => "Insert clip",
            EditCommand::Move { .. } => "Move clip",
            EditCommand::SetPlaybackRate { .. } => "Change speed",
            EditCommand::SpeedUp { .. } => "Apply speed-up",
        }
    }

    /// Run the edit against `doc`.
    pub fn execute(&self, doc: &mut ProjectDocument, config: &TimelineConfig) -> EditResult<AppliedEdit> {
        let applied = match self {
            EditCommand::Split {
                clip_id,
                offset_ms,
                new_ids,
            } => {
                let out = edit::split_clip_with_ids(doc, clip_id, *offset_ms, new_ids.clone())?;
                let new_ids = vec![out.first_id.clone(), out.second_id.clone()];
                AppliedEdit {
                    command: EditCommand::Split {
                        clip_id: clip_id.clone(),
                        offset_ms: *offset_ms,
                        new_ids: Some((out.first_id, out.second_id)),
                    },
                    affected_clip_ids: new_ids.clone(),
                    inverse: Inverse::Unreplace {
                        track_index: out.track_index,
                        index: out.index,
                        replacement_ids: new_ids,
                        original: out.original,
                        effects: out.removed_effects,
                    },
                }
            }
            EditCommand::TrimStart {
                clip_id,
                new_start_ms,
            } => {
                let out = edit::trim_clip_start(doc, config, clip_id, *new_start_ms)?;
                AppliedEdit::restoring(self.clone(), out.original)
            }
            EditCommand::TrimEnd { clip_id, new_end_ms } => {
                let out = edit::trim_clip_end(doc, config, clip_id, *new_end_ms)?;
                AppliedEdit::restoring(self.clone(), out.original)
            }
            EditCommand::Duplicate { clip_id, new_id } => {
                let out = edit::duplicate_clip_with_id(doc, clip_id, new_id.clone())?;
                AppliedEdit {
                    command: EditCommand::Duplicate {
                        clip_id: clip_id.clone(),
                        new_id: Some(out.new_id.clone()),
                    },
                    affected_clip_ids: vec![out.new_id.clone()],
                    inverse: Inverse::Remove {
                        clip_id: out.new_id,
                        effects: vec![],
                    },
                }
            }
            EditCommand::Delete { clip_id } => {
                let out = edit::delete_clip(doc, clip_id)?;
                AppliedEdit {
                    command: self.clone(),
                    affected_clip_ids: vec![clip_id.clone()],
                    inverse: Inverse::Restore {
                        track_index: out.track_index,
                        index: out.index,
                        clip: out.clip,
                        effects: out.removed_effects,
                    },
                }
            }
            EditCommand::Insert { kind, clip, index } => {
                match edit::insert_clip(doc, *kind, clip.clone(), *index)? {
                    InsertOutcome::Inserted {
                        truncated_effects, ..
                    } => AppliedEdit {
                        command: self.clone(),
                        affected_clip_ids: vec![clip.id.clone()],
                        inverse: Inverse::Remove {
                            clip_id: clip.id.clone(),
                            effects: truncated_effects,
                        },
                    },
                    InsertOutcome::AlreadyPresent => AppliedEdit {
                        command: self.clone(),
                        affected_clip_ids: vec![],
                        inverse: Inverse::Nothing,
                    },
                }
            }
            EditCommand::Move { clip_id, to_index } => {
                let out = edit::move_clip(doc, clip_id, *to_index)?;
                AppliedEdit {
                    command: self.clone(),
                    affected_clip_ids: vec![clip_id.clone()],
                    inverse: Inverse::MoveBack {
                        clip_id: clip_id.clone(),
                        index: out.from_index,
                    },
                }
            }
            EditCommand::SetPlaybackRate { clip_id, rate } => {
                let out = edit::set_playback_rate(doc, config, clip_id, *rate)?;
                AppliedEdit::restoring(self.clone(), out.original)
            }
            EditCommand::SpeedUp {
                clip_id,
                periods,
                kinds,
                new_ids,
            } => {
                let out = speed_up::apply_speed_up_with_ids(doc, config, clip_id, periods, kinds, new_ids.clone())?;
                let SpeedUpOutcome {
                    track_index,
                    index,
                    original,
                    new_clip_ids,
                    removed_effects,
                } = out;
                AppliedEdit {
                    command: EditCommand::SpeedUp {
                        clip_id: clip_id.clone(),
                        periods: periods.clone(),
                        kinds: kinds.clone(),
                        new_ids: Some(new_clip_ids.clone()),
                    },
                    affected_clip_ids: new_clip_ids.clone(),
                    inverse: Inverse::Unreplace {
                        track_index,
                        index,
                        replacement_ids: new_clip_ids,
                        original,
                        effects: removed_effects,
                    },
                }
            }
        };
        Ok(applied)
    }
}

/// Data needed to invert an applied edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Inverse {
    /// Put a replaced clip back in place of its replacements.
    Unreplace {
        track_index: usize,
        index: usize,
        replacement_ids: Vec<String>,
        original: Clip,
        effects: Vec<Effect>,
    },
    /// Overwrite a clip with its earlier snapshot.
    Snapshot { clip: Clip },
    /// Remove a clip that the edit created.
    Remove { clip_id: String, effects: Vec<Effect> },
    /// Re-insert a removed clip.
    Restore {
        track_index: usize,
        index: usize,
        clip: Clip,
        effects: Vec<Effect>,
    },
    MoveBack { clip_id: String, index: usize },
    Nothing,
}

/// A command that has been executed, with its inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedEdit {
    /// The command with generated ids filled in.
    pub command: EditCommand,
    pub inverse: Inverse,
    /// Clips created or changed by the edit.
    pub affected_clip_ids: Vec<String>,
}

impl AppliedEdit {
    fn restoring(command: EditCommand, original: Clip) -> Self {
        Self {
            command,
            affected_clip_ids: vec![original.id.clone()],
            inverse: Inverse::Snapshot { clip: original },
        }
    }

    pub fn label(&self) -> &'static str {
        self.command.label()
    }

    /// Whether executing the command left the document as it was.
    pub fn is_noop(&self) -> bool {
        matches!(self.inverse, Inverse::Nothing)
    }

    /// Invert the edit. Each inverse reflows exactly once.
    pub fn undo(&self, doc: &mut ProjectDocument) -> EditResult<()> {
        match &self.inverse {
            Inverse::Unreplace {
                track_index,
                index,
                replacement_ids,
                original,
                effects,
            } => edit::restore_replaced(doc, *track_index, *index, replacement_ids, original, effects),
            Inverse::Snapshot { clip } => edit::restore_clip_snapshot(doc, clip, &[]),
            Inverse::Remove { clip_id, effects } => {
                edit::delete_clip(doc, clip_id)?;
                edit::restore_effects(doc, effects);
                Ok(())
            }
            Inverse::Restore {
                track_index,
                index,
                clip,
                effects,
            } => {
                edit::restore_clip(doc, *track_index, clip.clone(), *index)?;
                edit::restore_effects(doc, effects);
                Ok(())
            }
            Inverse::MoveBack { clip_id, index } => edit::move_clip(doc, clip_id, *index).map(|_| ()),
            Inverse::Nothing => Ok(()),
        }
    }
}
