//! Tracks: ordered clip sequences of one media type.

use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::Millis;

/// Media type carried by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Webcam,
}

/// An ordered list of clips.
///
/// Array order is the only sequencing information: clip `i` starts where
/// clip `i - 1` ends and the first clip starts at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub kind: TrackKind,

    #[serde(default)]
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            clips: vec![],
        }
    }

    pub fn with_clips(kind: TrackKind, clips: Vec<Clip>) -> Self {
        Self { kind, clips }
    }

    /// Array index of the clip with this id.
    pub fn index_of(&self, clip_id: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }

    pub fn clip(&self, clip_id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub fn clip_mut(&mut self, clip_id: &str) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == clip_id)
    }

    /// Clip covering a timeline instant (start inclusive, end exclusive).
    pub fn clip_at(&self, time: Millis) -> Option<&Clip> {
        self.clips
            .iter()
            .find(|c| time >= c.start_time && time < c.end_time())
    }

    /// Timeline end of the last clip.
    pub fn end_time(&self) -> Millis {
        self.clips
            .iter()
            .map(Clip::end_time)
            .fold(0.0_f64, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
