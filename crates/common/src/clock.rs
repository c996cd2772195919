//! Clock and timing utilities for timeline editing.
//!
//! Every successful edit stamps the project document with a modification
//! time. The stamp comes from an [`EditClock`] so hosts and tests can
//! control it. This module also provides frame-duration helpers shared by
//! the segmentation code.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of modification timestamps.
pub trait EditClock {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;

    /// Current time as an RFC 3339 string with millisecond precision.
    fn stamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl EditClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    /// Clock frozen at the given Unix time in milliseconds.
    /// Out-of-range values fall back to the Unix epoch.
    pub fn from_unix_ms(ms: i64) -> Self {
        Self {
            at: DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default(),
        }
    }
}

impl EditClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Duration of one output frame in milliseconds. A zero rate is treated as 1 fps.
pub fn frame_duration_ms(fps: u32) -> f64 {
    1000.0 / fps.max(1) as f64
}

/// Convert milliseconds to fractional seconds.
pub fn ms_to_secs(ms: f64) -> f64 {
    ms / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_stamp_is_stable() {
        let clock = FixedClock::from_unix_ms(1_700_000_000_123);
        assert_eq!(clock.stamp(), "2023-11-14T22:13:20.123Z");
        assert_eq!(clock.stamp(), clock.stamp());
    }

    #[test]
    fn test_system_clock_is_monotone_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_frame_duration() {
        assert!((frame_duration_ms(60) - 16.666_666).abs() < 1e-3);
        assert!((frame_duration_ms(30) - 33.333_333).abs() < 1e-3);
        assert!((frame_duration_ms(0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_conversions() {
        assert!((ms_to_secs(1500.0) - 1.5).abs() < 1e-9);
    }
}
