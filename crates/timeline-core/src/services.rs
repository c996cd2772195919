//! Narrow interfaces to the host's external services.
//!
//! The engine never loads files or analyzes media itself. Recording
//! metadata arrives through a [`MetadataSource`] and is cached in a
//! [`MetadataCache`]; speed-up suggestions come from an
//! [`EffectGenerator`].

use std::collections::HashMap;

use recut_common::RecutResult;
use recut_project_model::{Recording, RecordingMetadata};

use crate::speed_up::SpeedUpPeriod;

/// Storage layer that loads metadata for a recording.
pub trait MetadataSource {
    fn load_metadata(&self, recording_id: &str) -> RecutResult<RecordingMetadata>;
}

/// Analysis service that turns recording signals into suggestions.
pub trait EffectGenerator {
    /// Suggested speed-up periods in source time.
    fn suggest_speed_ups(
        &self,
        recording: &Recording,
        metadata: &RecordingMetadata,
    ) -> RecutResult<Vec<SpeedUpPeriod>>;
}

/// Metadata that has finished loading, keyed by recording id.
///
/// A recording missing from the cache is "not loaded yet", which is
/// different from a loaded recording without keyboard events.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    entries: HashMap<String, RecordingMetadata>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, recording_id: impl Into<String>, metadata: RecordingMetadata) {
        self.entries.insert(recording_id.into(), metadata);
    }

    pub fn get(&self, recording_id: &str) -> Option<&RecordingMetadata> {
        self.entries.get(recording_id)
    }

    pub fn is_loaded(&self, recording_id: &str) -> bool {
        self.entries.contains_key(recording_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
