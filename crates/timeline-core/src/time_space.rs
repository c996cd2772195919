//! Conversion between source time and timeline time.
//!
//! Source time is a position inside a recording; timeline time is a
//! position inside the assembled sequence. A clip maps its source window
//! `[source_in, source_out)` onto `[start_time, start_time + duration)`,
//! compressed or stretched by `playback_rate`.
//!
//! Every function here is pure and total for finite input. A stored rate
//! that is zero, negative, or non-finite is read as 1.0 so conversions never
//! divide by zero; edit operations reject such rates before storing them.

use recut_project_model::{Clip, Millis};

/// Slowest rate a clip may be given.
pub const MIN_PLAYBACK_RATE: f64 = 0.0625;

/// Fastest rate a clip may be given.
pub const MAX_PLAYBACK_RATE: f64 = 16.0;

/// Whether a rate may be stored on a clip.
pub fn is_valid_playback_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Rate used for conversions: the stored rate, or 1.0 when it is unusable.
pub fn effective_rate(rate: f64) -> f64 {
    if is_valid_playback_rate(rate) {
        rate
    } else {
        1.0
    }
}

/// Sanitize a requested rate: unusable values become 1.0, usable ones are
/// clamped to `[MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE]`.
pub fn sanitize_playback_rate(rate: f64) -> f64 {
    effective_rate(rate).clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

/// Timeline length of a source window played at `rate`.
pub fn span_duration(source_in: Millis, source_out: Millis, rate: f64) -> Millis {
    (source_out - source_in) / effective_rate(rate)
}

/// Timeline length of a clip derived from its trim window and rate.
pub fn timeline_duration(clip: &Clip) -> Millis {
    span_duration(clip.source_in, clip.source_out, clip.playback_rate)
}

/// Map a source instant onto the timeline through `clip`.
pub fn source_to_timeline(source_ms: Millis, clip: &Clip) -> Millis {
    clip.start_time + (source_ms - clip.source_in) / effective_rate(clip.playback_rate)
}

/// Map a timeline instant back into source time through `clip`.
pub fn timeline_to_source(timeline_ms: Millis, clip: &Clip) -> Millis {
    clip.source_in + (timeline_ms - clip.start_time) * effective_rate(clip.playback_rate)
}

/// Source distance covered by a timeline distance at `rate`.
pub fn source_delta(timeline_delta: Millis, rate: f64) -> Millis {
    timeline_delta * effective_rate(rate)
}

/// Timeline distance covered by a source distance at `rate`.
pub fn timeline_delta(source_delta: Millis, rate: f64) -> Millis {
    source_delta / effective_rate(rate)
}

/// Whether a timeline instant falls inside the clip (end exclusive).
pub fn clip_contains_timeline_time(clip: &Clip, timeline_ms: Millis) -> bool {
    timeline_ms >= clip.start_time && timeline_ms < clip.end_time()
}

/// Whether a source instant falls inside the clip's trim window (end exclusive).
pub fn clip_contains_source_time(clip: &Clip, source_ms: Millis) -> bool {
    source_ms >= clip.source_in && source_ms < clip.source_out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> Clip {
        Clip::with_id("c", "rec", 2000.0, 6000.0)
            .at_rate(2.0)
            .starting_at(10_000.0)
    }

    #[test]
    fn test_duration_accounts_for_rate() {
        assert!((timeline_duration(&clip()) - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_source_to_timeline() {
        let c = clip();
        assert!((source_to_timeline(2000.0, &c) - 10_000.0).abs() < 1e-9);
        assert!((source_to_timeline(4000.0, &c) - 11_000.0).abs() < 1e-9);
        assert!((source_to_timeline(6000.0, &c) - 12_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_timeline_to_source() {
        let c = clip();
        assert!((timeline_to_source(11_000.0, &c) - 4000.0).abs() < 1e-9);
        // Outside the clip still maps linearly
        assert!((timeline_to_source(9_000.0, &c) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate_is_read_as_real_time() {
        let mut c = clip();
        c.playback_rate = 0.0;
        assert!((timeline_duration(&c) - 4000.0).abs() < 1e-9);
        assert!(source_to_timeline(3000.0, &c).is_finite());
    }

    #[test]
    fn test_sanitize_playback_rate() {
        assert!((sanitize_playback_rate(f64::NAN) - 1.0).abs() < 1e-9);
        assert!((sanitize_playback_rate(-2.0) - 1.0).abs() < 1e-9);
        assert!((sanitize_playback_rate(64.0) - MAX_PLAYBACK_RATE).abs() < 1e-9);
        assert!((sanitize_playback_rate(1.5) - 1.5).abs() < 1e-9);
        assert!(!is_valid_playback_rate(0.0));
    }

    #[test]
    fn test_deltas_are_inverse() {
        let d = source_delta(300.0, 1.5);
        assert!((timeline_delta(d, 1.5) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_containment_is_half_open() {
        let c = clip();
        assert!(clip_contains_timeline_time(&c, 10_000.0));
        assert!(!clip_contains_timeline_time(&c, 12_000.0));
        assert!(clip_contains_source_time(&c, 2000.0));
        assert!(!clip_contains_source_time(&c, 6000.0));
    }
}
