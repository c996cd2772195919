//! Keystroke overlays derived from recording keyboard metadata.
//!
//! # Algorithm
//!
//! 1. **Cluster** each recording's key presses: a gap above `max_gap_ms`
//!    starts a new cluster. Clusters are padded by `padding_ms` on both
//!    sides and clamped to the recording.
//! 2. **Project** every cluster through every video clip of the recording,
//!    clamped to the clip's timeline bounds. Projections shorter than
//!    `min_duration_ms` are dropped.
//! 3. **Merge** the projections of one cluster that overlap or touch
//!    (within 1 ms) across all clips.
//! 4. **Emit** one effect per merged range with the id
//!    `keystroke:{recording}:{cluster}:{range}`, carrying over `enabled`
//!    and settings from the previous effect with the same identity.

use std::collections::{HashMap, HashSet};

use recut_common::KeystrokeTuning;
use recut_project_model::{
    Clip, Effect, EffectData, KeystrokeData, KeystrokeSettings, Millis, ProjectDocument,
    TrackKind,
};

use crate::services::MetadataCache;
use crate::sync::legacy_ids::{resolve_legacy_id, LegacyMatch};
use crate::time_space::source_to_timeline;

const ID_PREFIX: &str = "keystroke:";

/// Projections closer than this are merged.
const MERGE_TOLERANCE_MS: Millis = 1.0;

/// A run of key presses in source time.
#[derive(Debug, Clone, PartialEq)]
pub struct KeystrokeCluster {
    pub index: usize,
    /// Padded start in source time.
    pub start: Millis,
    /// Padded end in source time.
    pub end: Millis,
    pub key_count: usize,
}

/// Provenance encoded in a keystroke effect id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeystrokeKey {
    pub recording_id: String,
    pub cluster_index: usize,
    pub range_index: usize,
}

/// Result of a rebuild request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// Metadata for these recordings has not loaded; effects left untouched.
    Skipped { missing: Vec<String> },
    Rebuilt {
        emitted: usize,
        preserved: usize,
        removed: usize,
    },
}

/// User-owned state carried across rebuilds.
#[derive(Debug, Clone)]
struct PriorState {
    enabled: bool,
    settings: KeystrokeSettings,
}

/// Build the id for a merged keystroke range.
pub fn keystroke_effect_id(recording_id: &str, cluster_index: usize, range_index: usize) -> String {
    format!("{ID_PREFIX}{recording_id}:{cluster_index}:{range_index}")
}

/// Parse an id produced by [`keystroke_effect_id`].
pub fn parse_keystroke_effect_id(id: &str) -> Option<KeystrokeKey> {
    let rest = id.strip_prefix(ID_PREFIX)?;
    let mut parts = rest.rsplitn(3, ':');
    let range_index = parts.next()?.parse().ok()?;
    let cluster_index = parts.next()?.parse().ok()?;
    let recording_id = parts.next().filter(|r| !r.is_empty())?;
    Some(KeystrokeKey {
        recording_id: recording_id.to_string(),
        cluster_index,
        range_index,
    })
}

/// Group sorted press times into padded clusters.
pub fn cluster_key_presses(
    press_times: &[Millis],
    tuning: &KeystrokeTuning,
    recording_duration: Option<Millis>,
) -> Vec<KeystrokeCluster> {
    let mut clusters: Vec<KeystrokeCluster> = vec![];
    let mut run: Option<(Millis, Millis, usize)> = None;

    for &t in press_times {
        run = match run {
            Some((first, last, count)) if t - last <= tuning.max_gap_ms => Some((first, t, count + 1)),
            Some(done) => {
                clusters.push(padded(clusters.len(), done, tuning, recording_duration));
                Some((t, t, 1))
            }
            None => Some((t, t, 1)),
        };
    }
    if let Some(done) = run {
        clusters.push(padded(clusters.len(), done, tuning, recording_duration));
    }

    clusters
}

fn padded(
    index: usize,
    (first, last, key_count): (Millis, Millis, usize),
    tuning: &KeystrokeTuning,
    recording_duration: Option<Millis>,
) -> KeystrokeCluster {
    let mut end = last + tuning.padding_ms;
    if let Some(limit) = recording_duration.filter(|d| d.is_finite() && *d > 0.0) {
        end = end.min(limit);
    }
    KeystrokeCluster {
        index,
        start: (first - tuning.padding_ms).max(0.0),
        end,
        key_count,
    }
}

/// Timeline range of a cluster seen through one clip, if long enough.
pub fn project_cluster(
    cluster: &KeystrokeCluster,
    clip: &Clip,
    min_duration_ms: Millis,
) -> Option<(Millis, Millis)> {
    let source_start = cluster.start.max(clip.source_in);
    let source_end = cluster.end.min(clip.source_out);
    if source_end <= source_start {
        return None;
    }

    let start = source_to_timeline(source_start, clip).max(clip.start_time);
    let end = source_to_timeline(source_end, clip).min(clip.end_time());
    (end - start >= min_duration_ms).then_some((start, end))
}

/// Merge ranges that overlap or touch within 1 ms.
pub fn merge_ranges(mut ranges: Vec<(Millis, Millis)>) -> Vec<(Millis, Millis)> {
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(Millis, Millis)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 + MERGE_TOLERANCE_MS => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Recordings referenced by video clips, in order of first appearance.
fn referenced_recordings(doc: &ProjectDocument) -> Vec<String> {
    let mut seen = HashSet::new();
    doc.clips_of_kind(TrackKind::Video)
        .filter(|c| seen.insert(c.recording_id.clone()))
        .map(|c| c.recording_id.clone())
        .collect()
}

/// Collect user state from the current keystroke effects.
fn collect_prior_state(
    doc: &ProjectDocument,
) -> (
    HashMap<KeystrokeKey, PriorState>,
    HashMap<(String, usize), PriorState>,
) {
    let mut exact = HashMap::new();
    let mut by_cluster = HashMap::new();

    for effect in doc.effects.iter() {
        let EffectData::Keystroke(data) = &effect.data else {
            continue;
        };
        let state = PriorState {
            enabled: effect.enabled,
            settings: data.settings.clone(),
        };

        if let Some(key) = parse_keystroke_effect_id(&effect.id) {
            exact.insert(key, state);
            continue;
        }
        match resolve_legacy_id(&effect.id, doc) {
            Some(LegacyMatch::Range {
                recording_id,
                cluster_index,
                range_index,
            }) => {
                exact.entry(KeystrokeKey {
                    recording_id,
                    cluster_index,
                    range_index,
                })
                .or_insert(state);
            }
            Some(LegacyMatch::Cluster {
                recording_id,
                cluster_index,
            }) => {
                by_cluster.entry((recording_id, cluster_index)).or_insert(state);
            }
            None => {
                tracing::debug!(effect_id = %effect.id, "Keystroke effect id not recognized");
            }
        }
    }

    (exact, by_cluster)
}

/// Regenerate every keystroke effect from the loaded metadata.
///
/// Skipped, with effects untouched, while any recording referenced by a
/// video clip still lacks metadata.
pub fn rebuild_keystroke_effects(
    doc: &mut ProjectDocument,
    metadata: &MetadataCache,
    tuning: &KeystrokeTuning,
) -> RebuildOutcome {
    let recordings = referenced_recordings(doc);
    let missing: Vec<String> = recordings
        .iter()
        .filter(|id| !metadata.is_loaded(id))
        .cloned()
        .collect();
    if !missing.is_empty() {
        tracing::debug!(?missing, "Keystroke rebuild deferred until metadata loads");
        return RebuildOutcome::Skipped { missing };
    }

    let (exact, by_cluster) = collect_prior_state(doc);
    let mut rebuilt = vec![];
    let mut preserved = 0;

    for recording_id in &recordings {
        let Some(meta) = metadata.get(recording_id) else {
            continue;
        };
        let press_times = meta.key_press_times();
        if press_times.is_empty() {
            continue;
        }

        let duration = doc.recording(recording_id).map(|r| r.duration_ms);
        let clusters = cluster_key_presses(&press_times, tuning, duration);
        let clips: Vec<&Clip> = doc
            .clips_of_kind(TrackKind::Video)
            .filter(|c| &c.recording_id == recording_id)
            .collect();

        for cluster in &clusters {
            let projections: Vec<(Millis, Millis)> = clips
                .iter()
                .filter_map(|clip| project_cluster(cluster, clip, tuning.min_duration_ms))
                .collect();

            for (range_index, (start, end)) in merge_ranges(projections).into_iter().enumerate() {
                let key = KeystrokeKey {
                    recording_id: recording_id.clone(),
                    cluster_index: cluster.index,
                    range_index,
                };
                let prior = exact
                    .get(&key)
                    .or_else(|| by_cluster.get(&(recording_id.clone(), cluster.index)));
                if prior.is_some() {
                    preserved += 1;
                }

                let mut effect = Effect::with_id(
                    keystroke_effect_id(recording_id, cluster.index, range_index),
                    EffectData::Keystroke(KeystrokeData {
                        recording_id: recording_id.clone(),
                        cluster_index: cluster.index,
                        key_count: cluster.key_count,
                        settings: prior.map(|p| p.settings.clone()).unwrap_or_default(),
                    }),
                    start,
                    end,
                );
                effect.enabled = prior.map_or(true, |p| p.enabled);
                rebuilt.push(effect);
            }
        }
    }

    let before = doc.effects.len();
    doc.effects.retain(|e| !e.is_keystroke());
    let removed = before - doc.effects.len();
    let emitted = rebuilt.len();
    doc.effects.extend(rebuilt);

    tracing::info!(emitted, preserved, removed, "Keystroke effects rebuilt");
    RebuildOutcome::Rebuilt {
        emitted,
        preserved,
        removed,
    }
}
