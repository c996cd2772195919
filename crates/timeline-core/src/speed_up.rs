//! Speed-up segmentation.
//!
//! Replaces one clip with a run of clips that together cover the same
//! source window, each with its own playback rate.
//!
//! # Algorithm
//!
//! 1. Keep periods of the requested kinds with a usable multiplier, clip
//!    them to the source window, sort them, and trim overlaps.
//! 2. Fill the gaps with 1x segments so the window is exactly partitioned.
//! 3. Merge segments whose output would be shorter than one frame into
//!    their predecessor. A short first segment has no predecessor and is
//!    folded forward into the second instead.
//! 4. Lay the segments out from the original clip's start.

use serde::{Deserialize, Serialize};

use recut_common::frame_duration_ms;
use recut_project_model::ids::new_clip_id;
use recut_project_model::{Clip, Effect, Millis, ProjectDocument};

use crate::config::TimelineConfig;
use crate::edit::{finish, restore_replaced};
use crate::error::{EditError, EditResult};
use crate::reflow::reflow_track;
use crate::sync::distribute_crop;
use crate::time_space::{effective_rate, span_duration};

/// Category of a suggested speed-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUpKind {
    /// Bursts of keyboard activity.
    Typing,
    /// Stretches with no input.
    Idle,
}

/// A suggested speed-up in source time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedUpPeriod {
    pub start_time: Millis,
    pub end_time: Millis,
    pub suggested_multiplier: f64,
    pub kind: SpeedUpKind,
}

impl SpeedUpPeriod {
    pub fn new(start_time: Millis, end_time: Millis, suggested_multiplier: f64, kind: SpeedUpKind) -> Self {
        Self {
            start_time,
            end_time,
            suggested_multiplier,
            kind,
        }
    }
}

/// One piece of the source partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub source_start: Millis,
    pub source_end: Millis,
    pub multiplier: f64,
    /// `None` for the 1x filler between periods.
    pub kind: Option<SpeedUpKind>,
}

impl Segment {
    fn filler(source_start: Millis, source_end: Millis) -> Self {
        Self {
            source_start,
            source_end,
            multiplier: 1.0,
            kind: None,
        }
    }

    pub fn source_len(&self) -> Millis {
        self.source_end - self.source_start
    }

    /// Timeline length when played on a clip with `base_rate`.
    pub fn output_len(&self, base_rate: f64, config: &TimelineConfig) -> Millis {
        span_duration(
            self.source_start,
            self.source_end,
            segment_rate(base_rate, self.multiplier, config),
        )
    }

    /// Whether the segment plays at a different rate than the clip would
    /// after clamping. A clip already at the rate limit gains nothing.
    fn is_sped_up(&self, base_rate: f64, config: &TimelineConfig) -> bool {
        segment_rate(base_rate, self.multiplier, config) != segment_rate(base_rate, 1.0, config)
    }
}

fn segment_rate(base_rate: f64, multiplier: f64, config: &TimelineConfig) -> f64 {
    config.clamp_rate(effective_rate(effective_rate(base_rate) * multiplier))
}

/// Result of replacing a clip with speed-up segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedUpOutcome {
    pub track_index: usize,
    pub index: usize,
    pub original: Clip,
    pub new_clip_ids: Vec<String>,
    /// The original's crop, replaced by per-segment copies.
    pub removed_effects: Vec<Effect>,
}

/// Usable periods of the requested kinds, clipped to `[source_in,
/// source_out]`, sorted, and made disjoint.
fn normalize_periods(clip: &Clip, periods: &[SpeedUpPeriod], kinds: &[SpeedUpKind]) -> Vec<Segment> {
    let mut clipped: Vec<Segment> = periods
        .iter()
        .filter(|p| kinds.contains(&p.kind))
        .filter(|p| p.suggested_multiplier.is_finite() && p.suggested_multiplier > 0.0)
        .filter(|p| p.start_time.is_finite() && p.end_time.is_finite())
        .map(|p| Segment {
            source_start: p.start_time.max(clip.source_in),
            source_end: p.end_time.min(clip.source_out),
            multiplier: p.suggested_multiplier,
            kind: Some(p.kind),
        })
        .filter(|s| s.source_end > s.source_start)
        .collect();
    clipped.sort_by(|a, b| a.source_start.total_cmp(&b.source_start));

    let mut disjoint: Vec<Segment> = Vec::with_capacity(clipped.len());
    for mut segment in clipped {
        if let Some(prev) = disjoint.last() {
            segment.source_start = segment.source_start.max(prev.source_end);
        }
        if segment.source_end > segment.source_start {
            disjoint.push(segment);
        }
    }
    disjoint
}

/// Cover the clip's source window with the periods plus 1x filler.
pub fn build_partition(clip: &Clip, periods: &[SpeedUpPeriod], kinds: &[SpeedUpKind]) -> Vec<Segment> {
    let mut partition = vec![];
    let mut cursor = clip.source_in;
    for segment in normalize_periods(clip, periods, kinds) {
        if segment.source_start > cursor {
            partition.push(Segment::filler(cursor, segment.source_start));
        }
        cursor = segment.source_end;
        partition.push(segment);
    }
    if cursor < clip.source_out {
        partition.push(Segment::filler(cursor, clip.source_out));
    }
    partition
}

/// Merge segments shorter than `frame_ms` of output.
pub fn merge_short_segments(
    partition: Vec<Segment>,
    base_rate: f64,
    frame_ms: Millis,
    config: &TimelineConfig,
) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(partition.len());
    for segment in partition {
        let short = segment.output_len(base_rate, config) < frame_ms;
        match merged.last_mut() {
            Some(prev) if short => prev.source_end = segment.source_end,
            _ => merged.push(segment),
        }
    }

    // The first segment had no predecessor to absorb it.
    if merged.len() >= 2 && merged[0].output_len(base_rate, config) < frame_ms {
        let first = merged.remove(0);
        merged[0].source_start = first.source_start;
    }
    merged
}

/// Plan the segments a speed-up would produce for `clip`.
pub fn plan_segments(
    clip: &Clip,
    periods: &[SpeedUpPeriod],
    kinds: &[SpeedUpKind],
    fps: u32,
    config: &TimelineConfig,
) -> Vec<Segment> {
    let partition = build_partition(clip, periods, kinds);
    merge_short_segments(partition, clip.playback_rate, frame_duration_ms(fps), config)
}

/// Turn planned segments into clips laid out from the original's start.
pub fn segment_clips(original: &Clip, segments: &[Segment], ids: Vec<String>, config: &TimelineConfig) -> Vec<Clip> {
    let last = segments.len().saturating_sub(1);
    let mut cursor = original.start_time;

    segments
        .iter()
        .zip(ids)
        .enumerate()
        .map(|(i, (segment, id))| {
            let mut clip = original.clone();
            clip.id = id;
            clip.source_in = segment.source_start;
            clip.source_out = segment.source_end;
            clip.playback_rate = segment_rate(original.playback_rate, segment.multiplier, config);
            clip.duration = span_duration(clip.source_in, clip.source_out, clip.playback_rate);
            clip.start_time = cursor;
            cursor += clip.duration;

            if i != 0 {
                clip.intro_fade_ms = None;
            }
            if i != last {
                clip.outro_fade_ms = None;
            }
            for fade in [clip.intro_fade_ms.as_mut(), clip.outro_fade_ms.as_mut()]
                .into_iter()
                .flatten()
            {
                *fade = fade.min(clip.duration);
            }

            if segment.is_sped_up(original.playback_rate, config) {
                match segment.kind {
                    Some(SpeedUpKind::Typing) => clip.typing_speed_applied = true,
                    Some(SpeedUpKind::Idle) => clip.idle_speed_applied = true,
                    None => {}
                }
            }
            clip
        })
        .collect()
}

/// Replace a clip with speed-up segments for the requested kinds.
pub fn apply_speed_up(
    doc: &mut ProjectDocument,
    config: &TimelineConfig,
    clip_id: &str,
    periods: &[SpeedUpPeriod],
    kinds: &[SpeedUpKind],
) -> EditResult<SpeedUpOutcome> {
    apply_speed_up_with_ids(doc, config, clip_id, periods, kinds, None)
}

/// Like [`apply_speed_up`], reusing `ids` for the segments when the plan
/// yields exactly that many.
pub fn apply_speed_up_with_ids(
    doc: &mut ProjectDocument,
    config: &TimelineConfig,
    clip_id: &str,
    periods: &[SpeedUpPeriod],
    kinds: &[SpeedUpKind],
    ids: Option<Vec<String>>,
) -> EditResult<SpeedUpOutcome> {
    let Some(loc) = doc.locate_clip(clip_id) else {
        tracing::debug!(clip_id, "Speed-up rejected: clip not found");
        return Err(EditError::clip_not_found(clip_id));
    };
    let original = doc.tracks[loc.track_index].clips[loc.clip_index].clone();

    let segments = plan_segments(&original, periods, kinds, doc.settings.fps, config);
    let unchanged = segments
        .iter()
        .all(|s| !s.is_sped_up(original.playback_rate, config));
    if unchanged {
        tracing::debug!(clip_id, "Speed-up rejected: no period applies");
        return Err(EditError::NothingToApply {
            clip_id: clip_id.to_string(),
        });
    }

    let ids = match ids {
        Some(ids) if ids.len() == segments.len() => ids,
        _ => segments.iter().map(|_| new_clip_id()).collect(),
    };
    let clips = segment_clips(&original, &segments, ids, config);
    let new_clip_ids: Vec<String> = clips.iter().map(|c| c.id.clone()).collect();

    let track = &mut doc.tracks[loc.track_index];
    track.clips.splice(loc.clip_index..=loc.clip_index, clips);
    reflow_track(track, loc.clip_index);

    let mut removed_effects: Vec<Effect> = distribute_crop(doc, clip_id, &new_clip_ids)
        .into_iter()
        .collect();
    removed_effects.extend(finish(doc));

    tracing::debug!(clip_id, segments = new_clip_ids.len(), "Speed-up applied");
    Ok(SpeedUpOutcome {
        track_index: loc.track_index,
        index: loc.clip_index,
        original,
        new_clip_ids,
        removed_effects,
    })
}

/// Undo [`apply_speed_up`]: drop the segments and put the original back,
/// reflowing once.
pub fn restore_speed_up(doc: &mut ProjectDocument, outcome: &SpeedUpOutcome) -> EditResult<()> {
    restore_replaced(
        doc,
        outcome.track_index,
        outcome.index,
        &outcome.new_clip_ids,
        &outcome.original,
        &outcome.removed_effects,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflow::check_contiguity;
    use recut_project_model::{Recording, Region, TrackKind};

    const BOTH: &[SpeedUpKind] = &[SpeedUpKind::Typing, SpeedUpKind::Idle];

    fn config() -> TimelineConfig {
        TimelineConfig::default()
    }

    fn doc_with(clip: Clip) -> ProjectDocument {
        let mut doc = ProjectDocument::new("speed", 60);
        doc.add_recording(Recording::new(clip.recording_id.clone(), 60_000.0));
        let video = doc.ensure_track(TrackKind::Video);
        doc.tracks[video].clips.push(clip);
        doc
    }

    fn typing(start: Millis, end: Millis, multiplier: f64) -> SpeedUpPeriod {
        SpeedUpPeriod::new(start, end, multiplier, SpeedUpKind::Typing)
    }

    #[test]
    fn test_partition_covers_window() {
        let clip = Clip::with_id("c", "rec", 0.0, 10_000.0);
        let segments = plan_segments(&clip, &[typing(2000.0, 4000.0, 2.0)], BOTH, 60, &config());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].source_start, 0.0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].source_end, pair[1].source_start);
        }
        assert_eq!(segments[2].source_end, 10_000.0);

        let total: Millis = segments.iter().map(|s| s.output_len(1.0, &config())).sum();
        assert_eq!(total, 9000.0);
    }

    #[test]
    fn test_apply_total_duration_and_flags() {
        let clip = Clip::with_id("c", "rec", 0.0, 10_000.0).with_fades(Some(300.0), Some(400.0));
        let mut doc = doc_with(clip);
        let outcome = apply_speed_up(&mut doc, &config(), "c", &[typing(2000.0, 4000.0, 2.0)], BOTH).unwrap();

        let clips = &doc.tracks[0].clips;
        assert_eq!(clips.len(), 3);
        assert_eq!(outcome.new_clip_ids.len(), 3);
        assert_eq!(doc.duration_ms, 9000.0);
        assert_eq!(clips[1].playback_rate, 2.0);
        assert_eq!(clips[1].duration, 1000.0);
        assert!(clips[1].typing_speed_applied);
        assert!(!clips[0].typing_speed_applied);
        assert!(!clips[2].typing_speed_applied);
        assert_eq!(clips[0].intro_fade_ms, Some(300.0));
        assert_eq!(clips[0].outro_fade_ms, None);
        assert_eq!(clips[2].outro_fade_ms, Some(400.0));
        assert!(check_contiguity(&doc.tracks[0]).is_empty());
    }

    #[test]
    fn test_no_sub_frame_segments() {
        let clip = Clip::with_id("c", "rec", 0.0, 10_000.0);
        let periods = [
            typing(0.0, 10.0, 2.0),
            typing(5000.0, 5010.0, 4.0),
            typing(6000.0, 9995.0, 3.0),
        ];
        let frame = frame_duration_ms(60);
        let segments = plan_segments(&clip, &periods, BOTH, 60, &config());
        for segment in &segments {
            assert!(segment.output_len(1.0, &config()) >= frame, "{segment:?}");
        }
        assert_eq!(segments[0].source_start, 0.0);
        assert_eq!(segments.last().unwrap().source_end, 10_000.0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].source_end, pair[1].source_start);
        }
    }

    #[test]
    fn test_short_first_segment_folds_forward() {
        let clip = Clip::with_id("c", "rec", 0.0, 10_000.0);
        let segments = plan_segments(&clip, &[typing(0.0, 10.0, 2.0)], BOTH, 60, &config());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].source_start, 0.0);
        assert_eq!(segments[0].multiplier, 1.0);
    }

    #[test]
    fn test_overlapping_periods_are_trimmed() {
        let clip = Clip::with_id("c", "rec", 1000.0, 9000.0);
        let periods = [
            typing(0.0, 3000.0, 2.0),
            SpeedUpPeriod::new(2500.0, 5000.0, 4.0, SpeedUpKind::Idle),
        ];
        let segments = plan_segments(&clip, &periods, BOTH, 60, &config());
        assert_eq!(segments[0].source_start, 1000.0);
        assert_eq!(segments[0].source_end, 3000.0);
        assert_eq!(segments[1].source_start, 3000.0);
        assert_eq!(segments[1].source_end, 5000.0);
        assert_eq!(segments[2].multiplier, 1.0);
    }

    #[test]
    fn test_unrequested_kinds_are_ignored() {
        let clip = Clip::with_id("c", "rec", 0.0, 10_000.0);
        let mut doc = doc_with(clip);
        let before = doc.clone();
        let err = apply_speed_up(
            &mut doc,
            &config(),
            "c",
            &[typing(2000.0, 4000.0, 2.0)],
            &[SpeedUpKind::Idle],
        )
        .unwrap_err();
        assert!(matches!(err, EditError::NothingToApply { .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_clip_at_rate_limit_has_nothing_to_apply() {
        let clip = Clip::with_id("c", "rec", 0.0, 16_000.0).at_rate(config().max_playback_rate);
        let mut doc = doc_with(clip);
        let before = doc.clone();
        let err = apply_speed_up(&mut doc, &config(), "c", &[typing(2000.0, 8000.0, 2.0)], BOTH)
            .unwrap_err();
        assert!(matches!(err, EditError::NothingToApply { .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_clamped_segment_still_counts_when_rate_changes() {
        let clip = Clip::with_id("c", "rec", 0.0, 16_000.0).at_rate(12.0);
        let mut doc = doc_with(clip);
        apply_speed_up(&mut doc, &config(), "c", &[typing(0.0, 8000.0, 2.0)], BOTH).unwrap();
        let clips = &doc.tracks[0].clips;
        assert_eq!(clips[0].playback_rate, config().max_playback_rate);
        assert!(clips[0].typing_speed_applied);
        assert!(!clips[1].typing_speed_applied);
    }

    #[test]
    fn test_base_rate_compounds() {
        let clip = Clip::with_id("c", "rec", 0.0, 8000.0).at_rate(2.0);
        let mut doc = doc_with(clip);
        apply_speed_up(&mut doc, &config(), "c", &[typing(0.0, 4000.0, 2.0)], BOTH).unwrap();
        let clips = &doc.tracks[0].clips;
        assert_eq!(clips[0].playback_rate, 4.0);
        assert_eq!(clips[0].duration, 1000.0);
        assert_eq!(clips[1].playback_rate, 2.0);
        assert_eq!(clips[1].start_time, 1000.0);
    }

    #[test]
    fn test_restore_speed_up_is_exact() {
        let clip = Clip::with_id("c", "rec", 0.0, 10_000.0);
        let mut doc = doc_with(clip);
        doc.tracks[0]
            .clips
            .push(Clip::with_id("d", "rec", 20_000.0, 22_000.0).starting_at(10_000.0));
        doc.effects.push(Effect::crop("c", Region::new(0.0, 0.0, 0.5, 0.5), 0.0, 10_000.0));
        let before_tracks = doc.tracks.clone();

        let outcome = apply_speed_up(&mut doc, &config(), "c", &[typing(2000.0, 4000.0, 2.0)], BOTH).unwrap();
        assert_eq!(outcome.removed_effects.len(), 1);
        assert_eq!(doc.effects.len(), 3);
        assert_eq!(doc.tracks[0].clips[3].start_time, 9000.0);

        restore_speed_up(&mut doc, &outcome).unwrap();
        assert_eq!(doc.tracks, before_tracks);
        assert_eq!(doc.effects.len(), 1);
        assert_eq!(doc.effects[0].crop_clip_id(), Some("c"));
    }

    #[test]
    fn test_preset_ids_are_reused() {
        let clip = Clip::with_id("c", "rec", 0.0, 10_000.0);
        let mut doc = doc_with(clip);
        let ids = vec!["s1".to_string(), "s2".to_string(), "s3".to_string()];
        let outcome = apply_speed_up_with_ids(
            &mut doc,
            &config(),
            "c",
            &[typing(2000.0, 4000.0, 2.0)],
            BOTH,
            Some(ids.clone()),
        )
        .unwrap();
        assert_eq!(outcome.new_clip_ids, ids);
    }
}
