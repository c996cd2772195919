//! Recut Project Model
//!
//! Defines the core data contracts for Recut projects:
//! - **Recordings:** Immutable-duration media sources and their keyboard metadata
//! - **Clips & Tracks:** Trimmed, rate-adjusted windows onto recordings, sequenced by array order
//! - **Effects:** Time-scoped overlays with strongly typed payloads
//! - **Project:** The document tying recordings, tracks, and effects together
//!
//! All times are milliseconds as `f64`. Clip and effect `start_time`/`end_time`
//! are timeline time; `source_in`/`source_out` and keyboard timestamps are
//! source time (relative to the start of the recording).

pub mod clip;
pub mod effect;
pub mod event;
pub mod ids;
pub mod project;
pub mod recording;
pub mod region;
pub mod track;

pub use clip::*;
pub use effect::*;
pub use event::*;
pub use project::*;
pub use recording::*;
pub use region::*;
pub use track::*;

/// Milliseconds, used for both source and timeline time.
pub type Millis = f64;
