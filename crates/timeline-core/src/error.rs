//! Rejected edits and missing references.
//!
//! Every variant is returned before the document is touched: an `Err`
//! from an edit operation guarantees no partial mutation.

use recut_project_model::{Millis, TrackKind};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Clip not found: {clip_id}")]
    ClipNotFound { clip_id: String },

    #[error("No {kind:?} track in project")]
    TrackNotFound { kind: TrackKind },

    #[error("Track index {index} out of range")]
    TrackIndexOutOfRange { index: usize },

    #[error("Split point {offset_ms}ms is outside clip {clip_id} (duration {duration_ms}ms)")]
    InvalidSplitPoint {
        clip_id: String,
        offset_ms: Millis,
        duration_ms: Millis,
    },

    #[error("Clip {clip_id} would be {duration_ms}ms, below the {min_ms}ms minimum")]
    BelowMinimumDuration {
        clip_id: String,
        duration_ms: Millis,
        min_ms: Millis,
    },

    #[error("Clip {clip_id} cannot cross its locked source bound at {bound_ms}ms")]
    LockedBound { clip_id: String, bound_ms: Millis },

    #[error("Source time {source_ms}ms is outside recording bounds for clip {clip_id}")]
    OutsideRecording { clip_id: String, source_ms: Millis },

    #[error("Timeline time {time_ms}ms is negative")]
    NegativeTime { time_ms: Millis },

    #[error("Non-finite value for {what}")]
    NonFinite { what: &'static str },

    #[error("Invalid playback rate {rate}")]
    InvalidPlaybackRate { rate: f64 },

    #[error("Invalid clip {clip_id}: {reason}")]
    InvalidClip { clip_id: String, reason: String },

    #[error("No speed-up period intersects clip {clip_id}")]
    NothingToApply { clip_id: String },
}

pub type EditResult<T> = Result<T, EditError>;

impl EditError {
    pub fn clip_not_found(clip_id: impl Into<String>) -> Self {
        Self::ClipNotFound {
            clip_id: clip_id.into(),
        }
    }

    /// Whether the edit was refused because of its arguments, as opposed
    /// to a reference that no longer exists.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            EditError::ClipNotFound { .. }
                | EditError::TrackNotFound { .. }
                | EditError::TrackIndexOutOfRange { .. }
        )
    }
}

impl From<EditError> for recut_common::RecutError {
    fn from(err: EditError) -> Self {
        recut_common::RecutError::edit(err.to_string())
    }
}
