//! Recut Timeline Core
//!
//! Keeps a multi-track, variable-speed clip sequence consistent and keeps
//! clip-bound and derived effects attached to the clips they describe:
//! - **Time-space conversion:** Map between source time and timeline time
//! - **Reflow:** Re-linearize a track from array order
//! - **Edits:** Split, trim, duplicate, delete, insert, move, re-time
//! - **Speed-up segmentation:** Replace a clip with per-range rate segments
//! - **Effect sync:** Crop binding, keystroke overlay rebuild, bleed prevention
//! - **Commands:** Reversible edits and an undo/redo history
//!
//! This crate is pure computation with no I/O and no platform dependencies.
//! External services (metadata loading, effect suggestion) are reached
//! through the traits in [`services`].

pub mod activity;
pub mod command;
pub mod config;
pub mod edit;
pub mod editor;
pub mod error;
pub mod history;
pub mod reflow;
pub mod services;
pub mod speed_up;
pub mod sync;
pub mod time_space;

pub use command::{AppliedEdit, EditCommand};
pub use config::TimelineConfig;
pub use editor::TimelineEditor;
pub use error::EditError;
pub use history::EditHistory;
pub use speed_up::{SpeedUpKind, SpeedUpPeriod};
