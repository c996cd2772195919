//! Property-based tests for timeline invariants.
//!
//! Random edit sequences must keep every track contiguous and every clip's
//! duration consistent with its source window and rate.

use proptest::prelude::*;
use recut_common::frame_duration_ms;
use recut_project_model::{Clip, ProjectDocument, Recording, TrackKind};
use recut_timeline_core::edit;
use recut_timeline_core::reflow::{check_contiguity, project_duration};
use recut_timeline_core::speed_up::{apply_speed_up, plan_segments};
use recut_timeline_core::time_space::{source_to_timeline, timeline_duration, timeline_to_source};
use recut_timeline_core::{SpeedUpKind, SpeedUpPeriod, TimelineConfig};

const RECORDING_MS: f64 = 120_000.0;

#[derive(Debug, Clone)]
enum Op {
    Split { pick: usize, at: f64 },
    TrimStart { pick: usize, delta: f64 },
    TrimEnd { pick: usize, delta: f64 },
    Duplicate { pick: usize },
    Delete { pick: usize },
    Insert { at: usize, source_in: f64, len: f64 },
    Move { pick: usize, to: usize },
    Rate { pick: usize, rate: f64 },
    SpeedUp { pick: usize, from: f64, span: f64, multiplier: f64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), 0.0f64..1.0).prop_map(|(pick, at)| Op::Split { pick, at }),
        (any::<usize>(), -5000.0f64..5000.0).prop_map(|(pick, delta)| Op::TrimStart { pick, delta }),
        (any::<usize>(), -5000.0f64..5000.0).prop_map(|(pick, delta)| Op::TrimEnd { pick, delta }),
        any::<usize>().prop_map(|pick| Op::Duplicate { pick }),
        any::<usize>().prop_map(|pick| Op::Delete { pick }),
        (any::<usize>(), 0.0f64..100_000.0, 500.0f64..10_000.0)
            .prop_map(|(at, source_in, len)| Op::Insert { at, source_in, len }),
        (any::<usize>(), any::<usize>()).prop_map(|(pick, to)| Op::Move { pick, to }),
        (any::<usize>(), 0.1f64..8.0).prop_map(|(pick, rate)| Op::Rate { pick, rate }),
        (any::<usize>(), 0.0f64..1.0, 0.0f64..1.0, 0.25f64..8.0).prop_map(
            |(pick, from, span, multiplier)| Op::SpeedUp {
                pick,
                from,
                span,
                multiplier
            }
        ),
    ]
}

fn seed_document() -> ProjectDocument {
    let mut doc = ProjectDocument::new("props", 60);
    doc.add_recording(Recording::new("rec", RECORDING_MS));
    let video = doc.ensure_track(TrackKind::Video);
    doc.tracks[video].clips = vec![
        Clip::with_id("a", "rec", 0.0, 8000.0),
        Clip::with_id("b", "rec", 10_000.0, 16_000.0).starting_at(8000.0),
        Clip::with_id("c", "rec", 30_000.0, 34_000.0).starting_at(14_000.0),
    ];
    doc.duration_ms = project_duration(&doc);
    doc
}

fn picked(doc: &ProjectDocument, pick: usize) -> Option<Clip> {
    let clips = &doc.track(TrackKind::Video)?.clips;
    if clips.is_empty() {
        return None;
    }
    Some(clips[pick % clips.len()].clone())
}

fn apply(doc: &mut ProjectDocument, config: &TimelineConfig, op: &Op) {
    // Rejections are expected; only the invariants matter here.
    match *op {
        Op::Split { pick, at } => {
            if let Some(clip) = picked(doc, pick) {
                let _ = edit::split_clip(doc, &clip.id, clip.duration * at);
            }
        }
        Op::TrimStart { pick, delta } => {
            if let Some(clip) = picked(doc, pick) {
                let _ = edit::trim_clip_start(doc, config, &clip.id, clip.start_time + delta);
            }
        }
        Op::TrimEnd { pick, delta } => {
            if let Some(clip) = picked(doc, pick) {
                let _ = edit::trim_clip_end(doc, config, &clip.id, clip.end_time() + delta);
            }
        }
        Op::Duplicate { pick } => {
            if let Some(clip) = picked(doc, pick) {
                let _ = edit::duplicate_clip(doc, &clip.id);
            }
        }
        Op::Delete { pick } => {
            if let Some(clip) = picked(doc, pick) {
                let _ = edit::delete_clip(doc, &clip.id);
            }
        }
        Op::Insert { at, source_in, len } => {
            let clip = Clip::new("rec", source_in, source_in + len);
            let _ = edit::insert_clip(doc, TrackKind::Video, clip, at % 8);
        }
        Op::Move { pick, to } => {
            if let Some(clip) = picked(doc, pick) {
                let _ = edit::move_clip(doc, &clip.id, to % 8);
            }
        }
        Op::Rate { pick, rate } => {
            if let Some(clip) = picked(doc, pick) {
                let _ = edit::set_playback_rate(doc, config, &clip.id, rate);
            }
        }
        Op::SpeedUp {
            pick,
            from,
            span,
            multiplier,
        } => {
            if let Some(clip) = picked(doc, pick) {
                let start = clip.source_in + clip.source_duration() * from;
                let end = start + (clip.source_out - start) * span;
                let period = SpeedUpPeriod::new(start, end, multiplier, SpeedUpKind::Typing);
                let _ = apply_speed_up(doc, config, &clip.id, &[period], &[SpeedUpKind::Typing]);
            }
        }
    }
}

proptest! {
    /// Every track stays contiguous after every operation.
    #[test]
    fn edits_preserve_contiguity(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let config = TimelineConfig::default();
        let mut doc = seed_document();

        for op in &ops {
            apply(&mut doc, &config, op);

            for track in &doc.tracks {
                let issues = check_contiguity(track);
                prop_assert!(issues.is_empty(), "{:?} after {:?}", issues, op);
                for clip in &track.clips {
                    prop_assert!((clip.duration - timeline_duration(clip)).abs() <= 1.0);
                    prop_assert!(clip.source_out > clip.source_in);
                }
            }
            prop_assert_eq!(doc.duration_ms, project_duration(&doc));
        }
    }

    /// Source → timeline → source returns the starting instant.
    #[test]
    fn time_space_round_trip(
        source_in in 0.0f64..50_000.0,
        len in 1.0f64..50_000.0,
        start in 0.0f64..100_000.0,
        rate in 0.0625f64..16.0,
        frac in 0.0f64..=1.0,
    ) {
        let clip = Clip::with_id("c", "rec", source_in, source_in + len)
            .at_rate(rate)
            .starting_at(start);
        let source = source_in + len * frac;
        let back = timeline_to_source(source_to_timeline(source, &clip), &clip);
        prop_assert!((back - source).abs() < 1e-6, "{} vs {}", back, source);
    }

    /// A split keeps the source window and the total duration.
    #[test]
    fn split_is_lossless(
        len in 2000.0f64..60_000.0,
        rate in 0.25f64..4.0,
        frac in 0.01f64..0.99,
    ) {
        let mut doc = ProjectDocument::new("split", 60);
        doc.add_recording(Recording::new("rec", RECORDING_MS));
        doc.tracks[0].clips = vec![Clip::with_id("x", "rec", 1000.0, 1000.0 + len).at_rate(rate)];
        let original = doc.tracks[0].clips[0].clone();

        let outcome = edit::split_clip(&mut doc, "x", original.duration * frac).unwrap();
        let first = doc.clip(&outcome.first_id).unwrap();
        let second = doc.clip(&outcome.second_id).unwrap();

        prop_assert_eq!(first.source_in, original.source_in);
        prop_assert_eq!(first.source_out, second.source_in);
        prop_assert_eq!(second.source_out, original.source_out);
        prop_assert_eq!(second.start_time, first.end_time());
        prop_assert!((first.duration + second.duration - original.duration).abs() < 1e-6);
    }

    /// Segments partition the window and none is shorter than a frame.
    #[test]
    fn speed_up_segments_cover_window(
        len in 1000.0f64..60_000.0,
        periods in prop::collection::vec((0.0f64..1.0, 0.0f64..0.2, 0.25f64..8.0), 0..8),
    ) {
        let clip = Clip::with_id("x", "rec", 0.0, len);
        let periods: Vec<SpeedUpPeriod> = periods
            .into_iter()
            .map(|(from, span, m)| SpeedUpPeriod::new(from * len, (from + span) * len, m, SpeedUpKind::Idle))
            .collect();
        let config = TimelineConfig::default();
        let segments = plan_segments(&clip, &periods, &[SpeedUpKind::Idle], 60, &config);

        prop_assert!(!segments.is_empty());
        prop_assert_eq!(segments[0].source_start, 0.0);
        prop_assert_eq!(segments[segments.len() - 1].source_end, len);
        for pair in segments.windows(2) {
            prop_assert_eq!(pair[0].source_end, pair[1].source_start);
        }
        let frame = frame_duration_ms(60);
        for segment in &segments {
            prop_assert!(segment.output_len(1.0, &config) >= frame, "{:?}", segment);
        }
    }
}
