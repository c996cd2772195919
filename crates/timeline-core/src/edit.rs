//! Clip edit operations.
//!
//! Every operation validates its arguments before touching the document,
//! so an `Err` always means nothing changed. On success the affected track
//! has been reflowed, the project duration recomputed, and crop effects
//! re-synchronized. Operations that remove or replace clips return the
//! snapshots needed to invert them.

use recut_project_model::ids::new_clip_id;
use recut_project_model::{Clip, ClipLocation, Effect, Millis, ProjectDocument, TrackKind};

use crate::config::TimelineConfig;
use crate::error::{EditError, EditResult};
use crate::reflow::{project_duration, reflow_track};
use crate::sync::{distribute_crop, duplicate_crop, sync_crop_effects, truncate_bleeding_effects};
use crate::time_space::{
    is_valid_playback_rate, source_delta, span_duration, timeline_duration, timeline_to_source,
    MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE,
};

/// Slack for floating-point comparisons against limits.
const EPSILON_MS: Millis = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub track_index: usize,
    /// Index the original clip occupied (now the first half).
    pub index: usize,
    pub original: Clip,
    pub first_id: String,
    pub second_id: String,
    /// Effects removed by the split (the original's crop).
    pub removed_effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrimOutcome {
    pub clip_id: String,
    /// The clip before trimming.
    pub original: Clip,
    /// Timeline length gained (positive) or lost (negative).
    pub duration_delta: Millis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateOutcome {
    pub track_index: usize,
    pub source_id: String,
    pub new_id: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub track_index: usize,
    pub index: usize,
    pub clip: Clip,
    /// Effects that became orphaned (the clip's crop).
    pub removed_effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted {
        track_index: usize,
        index: usize,
        /// Effects cut at the new clip's start, before the cut.
        truncated_effects: Vec<Effect>,
    },
    /// A clip with this id is already in the project; nothing changed.
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub clip_id: String,
    pub from_index: usize,
    pub to_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateOutcome {
    pub clip_id: String,
    pub original: Clip,
    /// Rate actually stored after clamping.
    pub applied_rate: f64,
}

fn rejected<T>(err: EditError) -> EditResult<T> {
    tracing::debug!(%err, "Edit rejected");
    Err(err)
}

fn locate(doc: &ProjectDocument, clip_id: &str) -> EditResult<ClipLocation> {
    match doc.locate_clip(clip_id) {
        Some(loc) => Ok(loc),
        None => rejected(EditError::clip_not_found(clip_id)),
    }
}

fn ensure_finite(value: f64, what: &'static str) -> EditResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        rejected(EditError::NonFinite { what })
    }
}

/// Cap fades so they never outlast the clip.
fn cap_fades(clip: &mut Clip) {
    let limit = clip.duration.max(0.0);
    if let Some(fade) = clip.intro_fade_ms.as_mut() {
        *fade = fade.min(limit);
    }
    if let Some(fade) = clip.outro_fade_ms.as_mut() {
        *fade = fade.min(limit);
    }
}

/// Recompute the project duration and re-bind crops. Returns orphaned crops.
pub(crate) fn finish(doc: &mut ProjectDocument) -> Vec<Effect> {
    doc.duration_ms = project_duration(doc);
    sync_crop_effects(doc).removed
}

/// Replace effects by id, appending those that are gone.
fn upsert_effects(doc: &mut ProjectDocument, effects: &[Effect]) {
    for effect in effects {
        match doc.effect_mut(&effect.id) {
            Some(existing) => *existing = effect.clone(),
            None => doc.effects.push(effect.clone()),
        }
    }
}

/// Put back effects captured by an earlier edit and re-bind crops.
pub fn restore_effects(doc: &mut ProjectDocument, effects: &[Effect]) {
    if effects.is_empty() {
        return;
    }
    upsert_effects(doc, effects);
    finish(doc);
}

/// Split a clip `offset_ms` into its timeline span.
pub fn split_clip(doc: &mut ProjectDocument, clip_id: &str, offset_ms: Millis) -> EditResult<SplitOutcome> {
    split_clip_with_ids(doc, clip_id, offset_ms, None)
}

/// Split with caller-chosen ids for the two halves (used to replay an edit).
pub fn split_clip_with_ids(
    doc: &mut ProjectDocument,
    clip_id: &str,
    offset_ms: Millis,
    ids: Option<(String, String)>,
) -> EditResult<SplitOutcome> {
    let loc = locate(doc, clip_id)?;
    let original = doc.tracks[loc.track_index].clips[loc.clip_index].clone();

    if !offset_ms.is_finite() || offset_ms <= 0.0 || offset_ms >= original.duration {
        return rejected(EditError::InvalidSplitPoint {
            clip_id: clip_id.to_string(),
            offset_ms,
            duration_ms: original.duration,
        });
    }

    let (first_id, second_id) = ids.unwrap_or_else(|| (new_clip_id(), new_clip_id()));
    let split_source = timeline_to_source(original.start_time + offset_ms, &original);

    let mut first = original.clone();
    first.id = first_id.clone();
    first.source_out = split_source;
    first.duration = timeline_duration(&first);
    first.outro_fade_ms = None;
    cap_fades(&mut first);

    let mut second = original.clone();
    second.id = second_id.clone();
    second.source_in = split_source;
    second.start_time = original.start_time + first.duration;
    second.duration = timeline_duration(&second);
    second.intro_fade_ms = None;
    cap_fades(&mut second);

    let track = &mut doc.tracks[loc.track_index];
    track
        .clips
        .splice(loc.clip_index..=loc.clip_index, [first, second]);
    reflow_track(track, loc.clip_index);

    let mut removed_effects: Vec<Effect> =
        distribute_crop(doc, clip_id, &[first_id.clone(), second_id.clone()])
            .into_iter()
            .collect();
    removed_effects.extend(finish(doc));

    tracing::debug!(clip_id, offset_ms, %first_id, %second_id, "Clip split");
    Ok(SplitOutcome {
        track_index: loc.track_index,
        index: loc.clip_index,
        original,
        first_id,
        second_id,
        removed_effects,
    })
}

/// Largest source time a clip may reach: its lock, else the recording end.
fn source_upper_limit(doc: &ProjectDocument, clip: &Clip) -> Option<(Millis, bool)> {
    if let Some(lock) = clip.locked_source_out {
        return Some((lock, true));
    }
    doc.recording(&clip.recording_id)
        .map(|r| r.duration_ms)
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| (d, false))
}

/// Move a clip's start to `new_start_ms` by trimming its source in-point.
pub fn trim_clip_start(
    doc: &mut ProjectDocument,
    config: &TimelineConfig,
    clip_id: &str,
    new_start_ms: Millis,
) -> EditResult<TrimOutcome> {
    ensure_finite(new_start_ms, "trim start")?;
    if new_start_ms < 0.0 {
        return rejected(EditError::NegativeTime {
            time_ms: new_start_ms,
        });
    }

    let loc = locate(doc, clip_id)?;
    let original = doc.tracks[loc.track_index].clips[loc.clip_index].clone();

    let delta = new_start_ms - original.start_time;
    let new_source_in = original.source_in + source_delta(delta, original.playback_rate);

    if new_source_in < -EPSILON_MS {
        return rejected(EditError::OutsideRecording {
            clip_id: clip_id.to_string(),
            source_ms: new_source_in,
        });
    }
    if let Some(lock) = original.locked_source_in {
        if new_source_in < lock - EPSILON_MS {
            return rejected(EditError::LockedBound {
                clip_id: clip_id.to_string(),
                bound_ms: lock,
            });
        }
    }
    let new_source_in = new_source_in.max(0.0);
    let new_duration = span_duration(new_source_in, original.source_out, original.playback_rate);
    if new_duration + EPSILON_MS < config.min_clip_duration_ms {
        return rejected(EditError::BelowMinimumDuration {
            clip_id: clip_id.to_string(),
            duration_ms: new_duration,
            min_ms: config.min_clip_duration_ms,
        });
    }

    let track = &mut doc.tracks[loc.track_index];
    let clip = &mut track.clips[loc.clip_index];
    clip.source_in = new_source_in;
    clip.duration = new_duration;
    cap_fades(clip);

    if delta > 0.0 {
        // Shrunk: close the gap it left everywhere.
        reflow_track(track, 0);
    } else {
        // Grew: the clip keeps its slot and pushes its successors.
        reflow_track(track, loc.clip_index);
    }
    finish(doc);

    tracing::debug!(clip_id, new_source_in, new_duration, "Clip start trimmed");
    Ok(TrimOutcome {
        clip_id: clip_id.to_string(),
        duration_delta: new_duration - original.duration,
        original,
    })
}

/// Move a clip's end to `new_end_ms` by trimming its source out-point.
pub fn trim_clip_end(
    doc: &mut ProjectDocument,
    config: &TimelineConfig,
    clip_id: &str,
    new_end_ms: Millis,
) -> EditResult<TrimOutcome> {
    ensure_finite(new_end_ms, "trim end")?;
    if new_end_ms < 0.0 {
        return rejected(EditError::NegativeTime { time_ms: new_end_ms });
    }

    let loc = locate(doc, clip_id)?;
    let original = doc.tracks[loc.track_index].clips[loc.clip_index].clone();

    let delta = new_end_ms - original.end_time();
    let new_source_out = original.source_out + source_delta(delta, original.playback_rate);

    if let Some((limit, locked)) = source_upper_limit(doc, &original) {
        if new_source_out > limit + EPSILON_MS {
            let err = if locked {
                EditError::LockedBound {
                    clip_id: clip_id.to_string(),
                    bound_ms: limit,
                }
            } else {
                EditError::OutsideRecording {
                    clip_id: clip_id.to_string(),
                    source_ms: new_source_out,
                }
            };
            return rejected(err);
        }
    }
    let new_duration = span_duration(original.source_in, new_source_out, original.playback_rate);
    if new_duration + EPSILON_MS < config.min_clip_duration_ms {
        return rejected(EditError::BelowMinimumDuration {
            clip_id: clip_id.to_string(),
            duration_ms: new_duration,
            min_ms: config.min_clip_duration_ms,
        });
    }

    let track = &mut doc.tracks[loc.track_index];
    let clip = &mut track.clips[loc.clip_index];
    clip.source_out = new_source_out;
    clip.duration = new_duration;
    cap_fades(clip);

    if delta > 0.0 {
        // Grew: shift every later clip forward by the expansion.
        reflow_track(track, loc.clip_index + 1);
    } else {
        reflow_track(track, 0);
    }
    finish(doc);

    tracing::debug!(clip_id, new_source_out, new_duration, "Clip end trimmed");
    Ok(TrimOutcome {
        clip_id: clip_id.to_string(),
        duration_delta: new_duration - original.duration,
        original,
    })
}

/// Insert a copy of a clip right after it.
pub fn duplicate_clip(doc: &mut ProjectDocument, clip_id: &str) -> EditResult<DuplicateOutcome> {
    duplicate_clip_with_id(doc, clip_id, None)
}

/// Duplicate with a caller-chosen id for the copy.
pub fn duplicate_clip_with_id(
    doc: &mut ProjectDocument,
    clip_id: &str,
    new_id: Option<String>,
) -> EditResult<DuplicateOutcome> {
    let loc = locate(doc, clip_id)?;
    let new_id = new_id.unwrap_or_else(new_clip_id);
    if doc.contains_clip(&new_id) {
        return rejected(EditError::InvalidClip {
            clip_id: new_id,
            reason: "id already in use".to_string(),
        });
    }

    let track = &mut doc.tracks[loc.track_index];
    let source = &track.clips[loc.clip_index];
    let mut copy = source.clone();
    copy.id = new_id.clone();
    copy.start_time = source.end_time();

    let index = loc.clip_index + 1;
    track.clips.insert(index, copy);
    reflow_track(track, index);

    duplicate_crop(doc, clip_id, &new_id);
    finish(doc);

    tracing::debug!(clip_id, %new_id, "Clip duplicated");
    Ok(DuplicateOutcome {
        track_index: loc.track_index,
        source_id: clip_id.to_string(),
        new_id,
        index,
    })
}

/// Remove a clip and close the gap.
pub fn delete_clip(doc: &mut ProjectDocument, clip_id: &str) -> EditResult<DeleteOutcome> {
    let loc = locate(doc, clip_id)?;
    let track = &mut doc.tracks[loc.track_index];
    let clip = track.clips.remove(loc.clip_index);
    reflow_track(track, 0);
    let removed_effects = finish(doc);

    tracing::debug!(clip_id, "Clip deleted");
    Ok(DeleteOutcome {
        track_index: loc.track_index,
        index: loc.clip_index,
        clip,
        removed_effects,
    })
}

fn validate_new_clip(clip: &Clip) -> EditResult<()> {
    let reason = if !(clip.source_in.is_finite() && clip.source_out.is_finite()) {
        Some("source bounds are not finite")
    } else if clip.source_in < 0.0 {
        Some("source_in is negative")
    } else if clip.source_out <= clip.source_in {
        Some("source window is empty")
    } else if !is_valid_playback_rate(clip.playback_rate) {
        Some("playback rate must be positive")
    } else {
        None
    };
    match reason {
        Some(reason) => rejected(EditError::InvalidClip {
            clip_id: clip.id.clone(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn splice_clip(doc: &mut ProjectDocument, track_index: usize, mut clip: Clip, index: usize) -> usize {
    let track = &mut doc.tracks[track_index];
    let index = index.min(track.clips.len());
    clip.duration = timeline_duration(&clip);
    track.clips.insert(index, clip);
    reflow_track(track, index);
    index
}

/// Insert a new clip into the first track of `kind` at `index` (clamped).
///
/// Enabled timeline-scoped effects spanning the new clip's start are cut
/// there. A clip whose id already exists anywhere is a no-op.
pub fn insert_clip(
    doc: &mut ProjectDocument,
    kind: TrackKind,
    clip: Clip,
    index: usize,
) -> EditResult<InsertOutcome> {
    if doc.contains_clip(&clip.id) {
        tracing::debug!(clip_id = %clip.id, "Insert skipped: clip already present");
        return Ok(InsertOutcome::AlreadyPresent);
    }
    validate_new_clip(&clip)?;
    if !(MIN_PLAYBACK_RATE..=MAX_PLAYBACK_RATE).contains(&clip.playback_rate) {
        return rejected(EditError::InvalidPlaybackRate {
            rate: clip.playback_rate,
        });
    }

    let track_index = doc.ensure_track(kind);
    let clip_id = clip.id.clone();
    let index = splice_clip(doc, track_index, clip, index);
    let start = doc.tracks[track_index].clips[index].start_time;
    let truncated_effects = truncate_bleeding_effects(doc, start);
    finish(doc);

    tracing::debug!(%clip_id, index, "Clip inserted");
    Ok(InsertOutcome::Inserted {
        track_index,
        index,
        truncated_effects,
    })
}

/// Put a previously removed clip back at `index` of a track.
///
/// Safe to call twice: a clip whose id already exists is left alone.
pub fn restore_clip(
    doc: &mut ProjectDocument,
    track_index: usize,
    clip: Clip,
    index: usize,
) -> EditResult<InsertOutcome> {
    if doc.contains_clip(&clip.id) {
        tracing::debug!(clip_id = %clip.id, "Restore skipped: clip already present");
        return Ok(InsertOutcome::AlreadyPresent);
    }
    if track_index >= doc.tracks.len() {
        return rejected(EditError::TrackIndexOutOfRange { index: track_index });
    }
    validate_new_clip(&clip)?;

    let index = splice_clip(doc, track_index, clip, index);
    finish(doc);
    Ok(InsertOutcome::Inserted {
        track_index,
        index,
        truncated_effects: vec![],
    })
}

/// Move a clip to another position within its track.
pub fn move_clip(doc: &mut ProjectDocument, clip_id: &str, to_index: usize) -> EditResult<MoveOutcome> {
    let loc = locate(doc, clip_id)?;
    let track = &mut doc.tracks[loc.track_index];
    let to_index = to_index.min(track.clips.len() - 1);

    if to_index != loc.clip_index {
        let clip = track.clips.remove(loc.clip_index);
        track.clips.insert(to_index, clip);
        reflow_track(track, 0);
        finish(doc);
        tracing::debug!(clip_id, from = loc.clip_index, to = to_index, "Clip moved");
    }

    Ok(MoveOutcome {
        clip_id: clip_id.to_string(),
        from_index: loc.clip_index,
        to_index,
    })
}

/// Change a clip's playback rate, keeping its source window.
pub fn set_playback_rate(
    doc: &mut ProjectDocument,
    config: &TimelineConfig,
    clip_id: &str,
    rate: f64,
) -> EditResult<RateOutcome> {
    if !is_valid_playback_rate(rate) {
        return rejected(EditError::InvalidPlaybackRate { rate });
    }
    let loc = locate(doc, clip_id)?;
    let applied_rate = config.clamp_rate(rate);

    let track = &mut doc.tracks[loc.track_index];
    let original = track.clips[loc.clip_index].clone();
    let clip = &mut track.clips[loc.clip_index];
    clip.playback_rate = applied_rate;
    clip.duration = timeline_duration(clip);
    cap_fades(clip);
    reflow_track(track, loc.clip_index);
    finish(doc);

    tracing::debug!(clip_id, applied_rate, "Playback rate changed");
    Ok(RateOutcome {
        clip_id: clip_id.to_string(),
        original,
        applied_rate,
    })
}

/// Put a clip snapshot back in place of the clip with the same id, then
/// restore effects captured alongside it. Reflows once.
pub fn restore_clip_snapshot(
    doc: &mut ProjectDocument,
    snapshot: &Clip,
    effects: &[Effect],
) -> EditResult<()> {
    let loc = locate(doc, &snapshot.id)?;
    let track = &mut doc.tracks[loc.track_index];
    track.clips[loc.clip_index] = snapshot.clone();
    reflow_track(track, 0);
    upsert_effects(doc, effects);
    finish(doc);
    Ok(())
}

/// Atomically undo a replace-style edit (split, speed-up): drop the
/// replacement clips, put `original` back at `index`, restore `effects`,
/// and reflow exactly once.
pub fn restore_replaced(
    doc: &mut ProjectDocument,
    track_index: usize,
    index: usize,
    replacement_ids: &[String],
    original: &Clip,
    effects: &[Effect],
) -> EditResult<()> {
    if track_index >= doc.tracks.len() {
        return rejected(EditError::TrackIndexOutOfRange { index: track_index });
    }

    let track = &mut doc.tracks[track_index];
    track.clips.retain(|c| !replacement_ids.contains(&c.id));
    let already_present = track.clips.iter().any(|c| c.id == original.id);
    if !already_present {
        let index = index.min(track.clips.len());
        track.clips.insert(index, original.clone());
    }
    reflow_track(track, 0);
    upsert_effects(doc, effects);
    finish(doc);

    tracing::debug!(clip_id = %original.id, replaced = replacement_ids.len(), "Clip restored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflow::check_contiguity;
    use recut_project_model::{EffectData, Recording, Region, ZoomData};

    fn config() -> TimelineConfig {
        TimelineConfig::default()
    }

    /// Three real-time clips of 4000, 3000, and 1200 ms.
    fn doc() -> ProjectDocument {
        let mut doc = ProjectDocument::new("edit", 60);
        doc.add_recording(Recording::new("rec", 30_000.0));
        let video = doc.ensure_track(TrackKind::Video);
        doc.tracks[video].clips = vec![
            Clip::with_id("a", "rec", 0.0, 4000.0).with_fades(Some(500.0), Some(800.0)),
            Clip::with_id("b", "rec", 10_000.0, 13_000.0).starting_at(4000.0),
            Clip::with_id("c", "rec", 20_000.0, 21_200.0).starting_at(7000.0),
        ];
        doc.duration_ms = 8200.0;
        doc
    }

    fn video(doc: &ProjectDocument) -> &Vec<Clip> {
        &doc.track(TrackKind::Video).unwrap().clips
    }

    fn assert_contiguous(doc: &ProjectDocument) {
        for track in &doc.tracks {
            assert!(check_contiguity(track).is_empty(), "{:?}", check_contiguity(track));
        }
    }

    #[test]
    fn test_split_replaces_in_place() {
        let mut doc = doc();
        let outcome = split_clip(&mut doc, "a", 1500.0).unwrap();
        let clips = video(&doc);
        assert_eq!(clips.len(), 4);
        assert_eq!(clips[0].id, outcome.first_id);
        assert_eq!(clips[1].id, outcome.second_id);
        assert_eq!(clips[0].source_in, 0.0);
        assert_eq!(clips[0].source_out, 1500.0);
        assert_eq!(clips[1].source_in, 1500.0);
        assert_eq!(clips[1].source_out, 4000.0);
        assert_eq!(clips[0].intro_fade_ms, Some(500.0));
        assert_eq!(clips[0].outro_fade_ms, None);
        assert_eq!(clips[1].intro_fade_ms, None);
        assert_eq!(clips[1].outro_fade_ms, Some(800.0));
        assert_eq!(clips[2].start_time, 4000.0);
        assert_eq!(outcome.original.id, "a");
        assert_contiguous(&doc);
    }

    #[test]
    fn test_split_with_rate_maps_source_point() {
        let mut doc = doc();
        set_playback_rate(&mut doc, &config(), "b", 2.0).unwrap();
        let outcome = split_clip(&mut doc, "b", 500.0).unwrap();
        let first = doc.clip(&outcome.first_id).unwrap();
        let second = doc.clip(&outcome.second_id).unwrap();
        assert_eq!(first.source_out, 11_000.0);
        assert_eq!(second.source_in, 11_000.0);
        assert_eq!(first.playback_rate, 2.0);
        assert_eq!(second.duration, 1000.0);
    }

    #[test]
    fn test_split_rejects_boundaries() {
        let mut doc = doc();
        let before = doc.clone();
        for offset in [0.0, -10.0, 4000.0, 5000.0, f64::NAN] {
            assert!(matches!(
                split_clip(&mut doc, "a", offset),
                Err(EditError::InvalidSplitPoint { .. })
            ));
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn test_split_moves_crop_to_both_halves() {
        let mut doc = doc();
        doc.effects
            .push(Effect::crop("a", Region::new(0.1, 0.1, 0.6, 0.6), 0.0, 4000.0));
        let outcome = split_clip(&mut doc, "a", 1000.0).unwrap();
        assert_eq!(outcome.removed_effects.len(), 1);
        let first_crop = doc
            .effects
            .iter()
            .find(|e| e.crop_clip_id() == Some(outcome.first_id.as_str()))
            .unwrap();
        assert_eq!((first_crop.start_time, first_crop.end_time), (0.0, 1000.0));
        let second_crop = doc
            .effects
            .iter()
            .find(|e| e.crop_clip_id() == Some(outcome.second_id.as_str()))
            .unwrap();
        assert_eq!((second_crop.start_time, second_crop.end_time), (1000.0, 4000.0));
        assert!(!doc.effects.iter().any(|e| e.crop_clip_id() == Some("a")));
    }

    #[test]
    fn test_trim_rejects_below_minimum() {
        let mut doc = doc();
        let before = doc.clone();
        // "c" is 1200ms long starting at 7000; ending 500ms after start is too short.
        let err = trim_clip_end(&mut doc, &config(), "c", 7500.0).unwrap_err();
        assert!(matches!(err, EditError::BelowMinimumDuration { .. }));
        let err = trim_clip_start(&mut doc, &config(), "c", 7500.0).unwrap_err();
        assert!(matches!(err, EditError::BelowMinimumDuration { .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_trim_start_shrink_closes_gap() {
        let mut doc = doc();
        let outcome = trim_clip_start(&mut doc, &config(), "b", 5000.0).unwrap();
        let clips = video(&doc);
        assert_eq!(clips[1].source_in, 11_000.0);
        assert_eq!(clips[1].start_time, 4000.0);
        assert_eq!(clips[1].duration, 2000.0);
        assert_eq!(clips[2].start_time, 6000.0);
        assert_eq!(outcome.duration_delta, -1000.0);
        assert_eq!(doc.duration_ms, 7200.0);
        assert_contiguous(&doc);
    }

    #[test]
    fn test_trim_start_expand_pushes_successors() {
        let mut doc = doc();
        trim_clip_start(&mut doc, &config(), "b", 3000.0).unwrap();
        let clips = video(&doc);
        assert_eq!(clips[1].source_in, 9000.0);
        assert_eq!(clips[1].start_time, 4000.0);
        assert_eq!(clips[1].duration, 4000.0);
        assert_eq!(clips[2].start_time, 8000.0);
        assert_contiguous(&doc);
    }

    #[test]
    fn test_trim_start_respects_locks_and_zero() {
        let mut doc = doc();
        doc.tracks[0].clips[1].locked_source_in = Some(9500.0);
        // "c" plays source 500..1700 so it cannot reach back a full second.
        doc.tracks[0].clips[2].source_in = 500.0;
        doc.tracks[0].clips[2].source_out = 1700.0;
        let before = doc.clone();
        assert!(matches!(
            trim_clip_start(&mut doc, &config(), "b", 3000.0),
            Err(EditError::LockedBound { bound_ms, .. }) if bound_ms == 9500.0
        ));
        assert!(matches!(
            trim_clip_start(&mut doc, &config(), "b", -1.0),
            Err(EditError::NegativeTime { .. })
        ));
        assert!(matches!(
            trim_clip_start(&mut doc, &config(), "c", 6000.0),
            Err(EditError::OutsideRecording { .. })
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_trim_end_expand_shifts_later_clips() {
        let mut doc = doc();
        trim_clip_end(&mut doc, &config(), "a", 5000.0).unwrap();
        let clips = video(&doc);
        assert_eq!(clips[0].source_out, 5000.0);
        assert_eq!(clips[1].start_time, 5000.0);
        assert_eq!(clips[2].start_time, 8000.0);
        assert_eq!(doc.duration_ms, 9200.0);
    }

    #[test]
    fn test_trim_end_respects_recording_and_lock() {
        let mut doc = doc();
        let before = doc.clone();
        assert!(matches!(
            trim_clip_end(&mut doc, &config(), "c", 20_000.0),
            Err(EditError::OutsideRecording { .. })
        ));
        doc.tracks[0].clips[1].locked_source_out = Some(13_500.0);
        let locked = doc.clone();
        assert!(matches!(
            trim_clip_end(&mut doc, &config(), "b", 8000.0),
            Err(EditError::LockedBound { .. })
        ));
        assert_eq!(doc, locked);
        assert_ne!(doc, before);
    }

    #[test]
    fn test_trim_caps_sticky_fades() {
        let mut doc = doc();
        doc.tracks[0].clips[0].intro_fade_ms = Some(3000.0);
        trim_clip_end(&mut doc, &config(), "a", 2000.0).unwrap();
        let a = doc.clip("a").unwrap();
        assert_eq!(a.intro_fade_ms, Some(2000.0));
        assert_eq!(a.outro_fade_ms, Some(800.0));
    }

    #[test]
    fn test_duplicate_inserts_after_source() {
        let mut doc = doc();
        let outcome = duplicate_clip(&mut doc, "b").unwrap();
        let clips = video(&doc);
        assert_eq!(clips.len(), 4);
        assert_eq!(clips[2].id, outcome.new_id);
        assert_eq!(clips[2].source_in, 10_000.0);
        assert_eq!(clips[2].start_time, 7000.0);
        assert_eq!(clips[3].start_time, 10_000.0);
        assert_eq!(doc.duration_ms, 11_200.0);
        assert_contiguous(&doc);
    }

    #[test]
    fn test_delete_closes_gap_and_drops_crop() {
        let mut doc = doc();
        doc.effects.push(Effect::crop("b", Region::FULL, 4000.0, 7000.0));
        let outcome = delete_clip(&mut doc, "b").unwrap();
        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.removed_effects.len(), 1);
        assert_eq!(video(&doc)[1].start_time, 4000.0);
        assert!(doc.effects.is_empty());
        assert_eq!(doc.duration_ms, 5200.0);
    }

    #[test]
    fn test_missing_clip_reports_not_found() {
        let mut doc = doc();
        assert_eq!(
            delete_clip(&mut doc, "nope").unwrap_err(),
            EditError::clip_not_found("nope")
        );
        assert!(!EditError::clip_not_found("x").is_rejection());
    }

    #[test]
    fn test_insert_is_idempotent_and_truncates_bleed() {
        let mut doc = doc();
        doc.effects.push(Effect::with_id(
            "zoom",
            EffectData::Zoom(ZoomData {
                scale: 2.0,
                target: Default::default(),
                auto: false,
            }),
            3000.0,
            6000.0,
        ));

        let clip = Clip::with_id("new", "rec", 0.0, 2000.0);
        let outcome = insert_clip(&mut doc, TrackKind::Video, clip.clone(), 1).unwrap();
        match outcome {
            InsertOutcome::Inserted {
                index,
                truncated_effects,
                ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(truncated_effects.len(), 1);
            }
            InsertOutcome::AlreadyPresent => panic!("expected insertion"),
        }
        assert_eq!(doc.effect("zoom").unwrap().end_time, 4000.0);
        assert_eq!(video(&doc)[2].start_time, 6000.0);

        let snapshot = doc.clone();
        assert_eq!(
            insert_clip(&mut doc, TrackKind::Video, clip, 0).unwrap(),
            InsertOutcome::AlreadyPresent
        );
        assert_eq!(doc, snapshot);
        assert_contiguous(&doc);
    }

    #[test]
    fn test_insert_rejects_bad_clip() {
        let mut doc = doc();
        let bad = Clip::with_id("bad", "rec", 100.0, 50.0);
        assert!(matches!(
            insert_clip(&mut doc, TrackKind::Video, bad, 0),
            Err(EditError::InvalidClip { .. })
        ));
    }

    #[test]
    fn test_insert_rejects_rate_outside_range() {
        let mut doc = doc();
        let snapshot = doc.clone();
        for rate in [1e-300, MIN_PLAYBACK_RATE / 2.0, MAX_PLAYBACK_RATE * 2.0] {
            let clip = Clip::with_id("odd-rate", "rec", 0.0, 1000.0).at_rate(rate);
            assert!(matches!(
                insert_clip(&mut doc, TrackKind::Video, clip, 1),
                Err(EditError::InvalidPlaybackRate { .. })
            ));
            assert_eq!(doc, snapshot);
        }

        let fast = Clip::with_id("fast", "rec", 0.0, 1600.0).at_rate(MAX_PLAYBACK_RATE);
        insert_clip(&mut doc, TrackKind::Video, fast, 1).unwrap();
        assert_eq!(doc.clip("fast").unwrap().duration, 100.0);
        assert_contiguous(&doc);
    }

    #[test]
    fn test_restore_clamps_index() {
        let mut doc = doc();
        let deleted = delete_clip(&mut doc, "a").unwrap();
        restore_clip(&mut doc, deleted.track_index, deleted.clip.clone(), 99).unwrap();
        assert_eq!(video(&doc).last().unwrap().id, "a");
        assert_eq!(
            restore_clip(&mut doc, deleted.track_index, deleted.clip, 0).unwrap(),
            InsertOutcome::AlreadyPresent
        );
        assert_contiguous(&doc);
    }

    #[test]
    fn test_move_clip_reflows() {
        let mut doc = doc();
        let outcome = move_clip(&mut doc, "c", 0).unwrap();
        assert_eq!(outcome.from_index, 2);
        let clips = video(&doc);
        assert_eq!(clips[0].id, "c");
        assert_eq!(clips[1].start_time, 1200.0);
        assert_contiguous(&doc);
    }

    #[test]
    fn test_set_playback_rate() {
        let mut doc = doc();
        let outcome = set_playback_rate(&mut doc, &config(), "a", 2.0).unwrap();
        assert_eq!(outcome.applied_rate, 2.0);
        let clips = video(&doc);
        assert_eq!(clips[0].duration, 2000.0);
        assert_eq!(clips[1].start_time, 2000.0);
        assert!(matches!(
            set_playback_rate(&mut doc, &config(), "a", 0.0),
            Err(EditError::InvalidPlaybackRate { .. })
        ));
        let clamped = set_playback_rate(&mut doc, &config(), "a", 1000.0).unwrap();
        assert_eq!(clamped.applied_rate, 16.0);
    }

    #[test]
    fn test_restore_replaced_undoes_split() {
        let mut doc = doc();
        let before = doc.clone();
        let outcome = split_clip(&mut doc, "b", 1000.0).unwrap();
        restore_replaced(
            &mut doc,
            outcome.track_index,
            outcome.index,
            &[outcome.first_id.clone(), outcome.second_id.clone()],
            &outcome.original,
            &outcome.removed_effects,
        )
        .unwrap();
        assert_eq!(doc.tracks, before.tracks);
    }

    #[test]
    fn test_restore_snapshot_undoes_trim() {
        let mut doc = doc();
        let before = doc.clone();
        let outcome = trim_clip_end(&mut doc, &config(), "a", 2500.0).unwrap();
        restore_clip_snapshot(&mut doc, &outcome.original, &[]).unwrap();
        assert_eq!(doc.tracks, before.tracks);
        assert_eq!(doc.duration_ms, before.duration_ms);
    }
}
