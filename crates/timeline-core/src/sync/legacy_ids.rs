//! Keystroke effect ids written by older documents.
//!
//! Each historical scheme has its own parser. A parsed id is only trusted
//! once the recording or clip it names is found in the document, which
//! separates the two dash-delimited schemes from each other.
//!
//! TODO: drop this table once documents older than schema 2.0 can no
//! longer be opened; no 2.0 document contains these ids.

use recut_project_model::ProjectDocument;

const LEGACY_PREFIX: &str = "keystroke-";

/// Identity recovered from a legacy id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyMatch {
    /// A specific merged range of a cluster.
    Range {
        recording_id: String,
        cluster_index: usize,
        range_index: usize,
    },
    /// Every range of a cluster (the id predates range merging).
    Cluster {
        recording_id: String,
        cluster_index: usize,
    },
}

/// `keystroke-{recording_id}-{cluster}-{range}`
fn parse_dashed(id: &str) -> Option<(&str, usize, usize)> {
    let rest = id.strip_prefix(LEGACY_PREFIX)?;
    let mut parts = rest.rsplitn(3, '-');
    let range_index = parts.next()?.parse().ok()?;
    let cluster_index = parts.next()?.parse().ok()?;
    let recording_id = parts.next().filter(|r| !r.is_empty())?;
    Some((recording_id, cluster_index, range_index))
}

/// `keystroke-{clip_id}-{cluster}`, one effect per clip per cluster.
fn parse_per_clip(id: &str) -> Option<(&str, usize)> {
    let rest = id.strip_prefix(LEGACY_PREFIX)?;
    let (clip_id, cluster) = rest.rsplit_once('-')?;
    if clip_id.is_empty() {
        return None;
    }
    Some((clip_id, cluster.parse().ok()?))
}

fn recording_known(doc: &ProjectDocument, recording_id: &str) -> bool {
    doc.recording(recording_id).is_some()
        || doc
            .tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .any(|c| c.recording_id == recording_id)
}

/// Resolve a legacy keystroke id against the current document.
pub fn resolve_legacy_id(id: &str, doc: &ProjectDocument) -> Option<LegacyMatch> {
    if let Some((recording_id, cluster_index, range_index)) = parse_dashed(id) {
        if recording_known(doc, recording_id) {
            return Some(LegacyMatch::Range {
                recording_id: recording_id.to_string(),
                cluster_index,
                range_index,
            });
        }
    }

    let (clip_id, cluster_index) = parse_per_clip(id)?;
    let clip = doc.clip(clip_id)?;
    Some(LegacyMatch::Cluster {
        recording_id: clip.recording_id.clone(),
        cluster_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recut_project_model::{Clip, Recording, TrackKind};

    fn doc() -> ProjectDocument {
        let mut doc = ProjectDocument::new("legacy", 60);
        doc.add_recording(Recording::new("rec-main", 60_000.0));
        let video = doc.ensure_track(TrackKind::Video);
        doc.tracks[video]
            .clips
            .push(Clip::with_id("clip-7", "rec-main", 0.0, 5000.0));
        doc
    }

    #[test]
    fn test_dashed_scheme() {
        assert_eq!(
            resolve_legacy_id("keystroke-rec-main-3-1", &doc()),
            Some(LegacyMatch::Range {
                recording_id: "rec-main".to_string(),
                cluster_index: 3,
                range_index: 1,
            })
        );
    }

    #[test]
    fn test_per_clip_scheme_resolves_through_clip() {
        assert_eq!(
            resolve_legacy_id("keystroke-clip-7-4", &doc()),
            Some(LegacyMatch::Cluster {
                recording_id: "rec-main".to_string(),
                cluster_index: 4,
            })
        );
    }

    #[test]
    fn test_unknown_owner_does_not_resolve() {
        assert_eq!(resolve_legacy_id("keystroke-other-1-0", &doc()), None);
        assert_eq!(resolve_legacy_id("keystroke-nothing-2", &doc()), None);
        assert_eq!(resolve_legacy_id("zoom-rec-main-1-0", &doc()), None);
        assert_eq!(resolve_legacy_id("keystroke--1", &doc()), None);
    }
}
