//! Keyboard activity analysis: suggests speed-ups from key press density.
//!
//! # Algorithm
//!
//! 1. **Chunk** the recording into fixed windows (default 2s).
//! 2. **Classify** each chunk by presses per second: typing above the
//!    threshold, idle with no presses, mixed otherwise.
//! 3. **Coalesce** neighboring chunks of the same class into runs.
//! 4. **Emit** typing runs and idle runs that are long enough. Idle runs
//!    are shrunk by a margin so the action around them stays real-time.

use recut_common::{ms_to_secs, RecutError, RecutResult};
use recut_project_model::{Millis, Recording, RecordingMetadata};

use crate::services::EffectGenerator;
use crate::speed_up::{SpeedUpKind, SpeedUpPeriod};

/// Configuration for the activity analyzer.
#[derive(Debug, Clone)]
pub struct ActivityConfig {
    /// Length of each analysis chunk.
    pub chunk_duration_ms: Millis,

    /// Presses per second at or above which a chunk counts as typing.
    pub typing_keys_per_sec: f64,

    /// Shortest typing run worth speeding up.
    pub min_typing_ms: Millis,

    /// Shortest idle run worth speeding up, before the margin.
    pub min_idle_ms: Millis,

    /// Real-time margin kept at each end of an idle run.
    pub idle_margin_ms: Millis,

    pub typing_multiplier: f64,
    pub idle_multiplier: f64,

    /// Recordings needing more chunks than this are refused.
    pub max_chunks: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            chunk_duration_ms: 2000.0,
            typing_keys_per_sec: 2.0,
            min_typing_ms: 4000.0,
            min_idle_ms: 6000.0,
            idle_margin_ms: 1000.0,
            typing_multiplier: 2.0,
            idle_multiplier: 4.0,
            // 100 hours of 2s chunks
            max_chunks: 180_000,
        }
    }
}

/// Classification of keyboard activity in a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    Typing,
    /// Some presses, below the typing threshold.
    Mixed,
    Idle,
}

/// Analysis result for a single chunk.
#[derive(Debug, Clone)]
pub struct ChunkActivity {
    pub start: Millis,
    pub end: Millis,
    pub key_count: usize,
    pub activity: ActivityType,
}

/// Suggests typing and idle speed-ups from keyboard metadata.
pub struct KeyboardActivityAnalyzer {
    config: ActivityConfig,
}

impl KeyboardActivityAnalyzer {
    pub fn new(config: ActivityConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ActivityConfig::default())
    }

    /// Number of chunks covering `[0, duration_ms)`, or `None` when the
    /// duration is not positive or needs more than `max_chunks`.
    pub fn chunk_count(&self, duration_ms: Millis) -> Option<usize> {
        let chunk = self.config.chunk_duration_ms;
        if !(duration_ms.is_finite() && duration_ms > 0.0 && chunk.is_finite() && chunk > 0.0) {
            return None;
        }
        let count = (duration_ms / chunk).ceil();
        (count <= self.config.max_chunks as f64).then_some(count as usize)
    }

    /// Chunk `[0, duration_ms)` and classify each window. Empty when
    /// [`chunk_count`](Self::chunk_count) refuses the duration.
    pub fn chunk_activity(&self, press_times: &[Millis], duration_ms: Millis) -> Vec<ChunkActivity> {
        let chunk = self.config.chunk_duration_ms;
        let Some(count) = self.chunk_count(duration_ms) else {
            return vec![];
        };

        let mut chunks = Vec::with_capacity(count);
        for i in 0..count {
            let start = i as f64 * chunk;
            let end = (start + chunk).min(duration_ms);
            if end <= start {
                break;
            }
            let key_count = press_times.iter().filter(|&&t| t >= start && t < end).count();
            let rate = key_count as f64 / ms_to_secs(end - start);
            let activity = if key_count == 0 {
                ActivityType::Idle
            } else if rate >= self.config.typing_keys_per_sec {
                ActivityType::Typing
            } else {
                ActivityType::Mixed
            };
            chunks.push(ChunkActivity {
                start,
                end,
                key_count,
                activity,
            });
        }
        chunks
    }

    /// Suggested periods for a recording, in source time.
    pub fn suggest(&self, press_times: &[Millis], duration_ms: Millis) -> Vec<SpeedUpPeriod> {
        let chunks = self.chunk_activity(press_times, duration_ms);

        let mut runs: Vec<(ActivityType, Millis, Millis)> = vec![];
        for chunk in &chunks {
            match runs.last_mut() {
                Some((activity, _, end)) if *activity == chunk.activity => *end = chunk.end,
                _ => runs.push((chunk.activity, chunk.start, chunk.end)),
            }
        }

        let margin = self.config.idle_margin_ms;
        runs.into_iter()
            .filter_map(|(activity, start, end)| match activity {
                ActivityType::Typing if end - start >= self.config.min_typing_ms => Some(
                    SpeedUpPeriod::new(start, end, self.config.typing_multiplier, SpeedUpKind::Typing),
                ),
                ActivityType::Idle if end - start >= self.config.min_idle_ms => {
                    let start = if start > 0.0 { start + margin } else { start };
                    let end = if end < duration_ms { end - margin } else { end };
                    (end > start).then(|| {
                        SpeedUpPeriod::new(start, end, self.config.idle_multiplier, SpeedUpKind::Idle)
                    })
                }
                _ => None,
            })
            .collect()
    }
}

impl Default for KeyboardActivityAnalyzer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EffectGenerator for KeyboardActivityAnalyzer {
    fn suggest_speed_ups(
        &self,
        recording: &Recording,
        metadata: &RecordingMetadata,
    ) -> RecutResult<Vec<SpeedUpPeriod>> {
        if recording.duration_ms > 0.0 && self.chunk_count(recording.duration_ms).is_none() {
            return Err(RecutError::generation(format!(
                "recording {} is too long to analyze ({}ms)",
                recording.id, recording.duration_ms
            )));
        }
        let periods = self.suggest(&metadata.key_press_times(), recording.duration_ms);
        tracing::debug!(
            recording_id = %recording.id,
            periods = periods.len(),
            "Speed-up suggestions computed"
        );
        Ok(periods)
    }
}
