//! Identifier generation for clips and effects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a process-unique id such as `clip-18c3f2a91b0-0007`.
///
/// The timestamp keeps ids distinct across sessions; the sequence number
/// keeps ids created within the same millisecond distinct.
pub fn new_id(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{millis:x}-{seq:04x}")
}

/// Generate a new clip id.
pub fn new_clip_id() -> String {
    new_id("clip")
}

/// Generate a new effect id.
pub fn new_effect_id() -> String {
    new_id("effect")
}

/// Generate a new project id.
pub fn new_project_id() -> String {
    new_id("project")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_in_tight_loop() {
        let ids: HashSet<String> = (0..1000).map(|_| new_clip_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_prefix() {
        assert!(new_effect_id().starts_with("effect-"));
        assert!(new_clip_id().starts_with("clip-"));
    }
}
