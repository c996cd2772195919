//! Track reflow: derive every clip's `start_time` from array order.
//!
//! Array order is the only sequencing truth. Reflow never reorders clips
//! and never touches trim windows or rates; it only rewrites `duration`
//! when it drifted from `(source_out - source_in) / playback_rate` and
//! `start_time` so that each clip begins where its predecessor ends.

use recut_project_model::{Clip, Millis, ProjectDocument, Track};

use crate::time_space::timeline_duration;

/// Stored durations within this distance of the formula are left alone.
pub const DURATION_TOLERANCE_MS: Millis = 1.0;

/// Gaps or overlaps smaller than this are not reported by [`check_contiguity`].
const CONTIGUITY_EPSILON_MS: Millis = 1e-6;

/// What a reflow pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflowReport {
    /// Clips whose stored duration was rewritten.
    pub durations_corrected: usize,
    /// Clips whose start time moved.
    pub starts_moved: usize,
}

impl ReflowReport {
    pub fn is_noop(&self) -> bool {
        self.durations_corrected == 0 && self.starts_moved == 0
    }
}

/// Reflow a clip sequence starting at `start_from`.
///
/// Durations are checked on every clip; start times are rewritten from
/// `max(1, start_from)` onwards, and the first clip is pinned to zero
/// when `start_from == 0`. Running it twice in a row is a no-op.
pub fn reflow(clips: &mut [Clip], start_from: usize) -> ReflowReport {
    let mut report = ReflowReport::default();

    for clip in clips.iter_mut() {
        let expected = timeline_duration(clip);
        if !expected.is_finite() {
            continue;
        }
        let expected = expected.max(0.0);
        if !clip.duration.is_finite() || (clip.duration - expected).abs() > DURATION_TOLERANCE_MS
        {
            tracing::warn!(
                clip_id = %clip.id,
                stored = clip.duration,
                expected,
                "Correcting drifted clip duration"
            );
            clip.duration = expected;
            report.durations_corrected += 1;
        }
    }

    if start_from == 0 {
        if let Some(first) = clips.first_mut() {
            if first.start_time != 0.0 {
                first.start_time = 0.0;
                report.starts_moved += 1;
            }
        }
    }

    for i in start_from.max(1)..clips.len() {
        let expected = clips[i - 1].end_time();
        if clips[i].start_time != expected {
            clips[i].start_time = expected;
            report.starts_moved += 1;
        }
    }

    report
}

/// Reflow a track and log the outcome.
pub fn reflow_track(track: &mut Track, start_from: usize) -> ReflowReport {
    let report = reflow(&mut track.clips, start_from);
    if !report.is_noop() {
        tracing::trace!(
            kind = ?track.kind,
            start_from,
            durations_corrected = report.durations_corrected,
            starts_moved = report.starts_moved,
            "Track reflowed"
        );
    }
    report
}

/// Reflow every track of a document from index zero.
pub fn reflow_all(doc: &mut ProjectDocument) -> ReflowReport {
    let mut total = ReflowReport::default();
    for track in &mut doc.tracks {
        let report = reflow_track(track, 0);
        total.durations_corrected += report.durations_corrected;
        total.starts_moved += report.starts_moved;
    }
    total
}

/// Timeline length of a document: the latest clip end across all tracks.
pub fn project_duration(doc: &ProjectDocument) -> Millis {
    doc.tracks
        .iter()
        .flat_map(|t| t.clips.iter())
        .map(Clip::end_time)
        .filter(|end| end.is_finite())
        .fold(0.0_f64, f64::max)
}

/// A place where a track breaks the contiguity invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct ContiguityIssue {
    pub clip_id: String,
    pub index: usize,
    pub expected_start: Millis,
    pub actual_start: Millis,
}

/// Report every clip whose start does not match its predecessor's end.
pub fn check_contiguity(track: &Track) -> Vec<ContiguityIssue> {
    let mut issues = vec![];
    let mut expected_start = 0.0;
    for (index, clip) in track.clips.iter().enumerate() {
        if (clip.start_time - expected_start).abs() > CONTIGUITY_EPSILON_MS {
            issues.push(ContiguityIssue {
                clip_id: clip.id.clone(),
                index,
                expected_start,
                actual_start: clip.start_time,
            });
        }
        expected_start = clip.end_time();
    }
    issues
}
