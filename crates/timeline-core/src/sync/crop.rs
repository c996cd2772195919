//! Crop effects follow the clip they were created for.

use std::collections::HashMap;

use recut_project_model::ids::new_effect_id;
use recut_project_model::{Clip, Effect, EffectData, Millis, ProjectDocument, Region, TrackKind};

const CROP_ID_PREFIX: &str = "crop-";

/// Outcome of a crop sync pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropSyncReport {
    /// Bound crops whose timing changed to match their clip.
    pub snapped: usize,
    /// Unbound crops that were attached to the clip they overlap most.
    pub rebound: usize,
    /// Crops whose clip no longer exists, in their pre-removal state.
    pub removed: Vec<Effect>,
}

/// Snap bound crops to their clip, rebind unbound ones, delete orphans.
pub fn sync_crop_effects(doc: &mut ProjectDocument) -> CropSyncReport {
    let bounds: HashMap<String, (Millis, Millis)> = doc
        .tracks
        .iter()
        .flat_map(|t| t.clips.iter())
        .map(|c| (c.id.clone(), (c.start_time, c.end_time())))
        .collect();

    // Unbound crops are matched against visual clips only.
    let candidates: Vec<Clip> = doc.clips_of_kind(TrackKind::Video).cloned().collect();

    let mut report = CropSyncReport::default();
    let mut kept = Vec::with_capacity(doc.effects.len());

    for mut effect in std::mem::take(&mut doc.effects) {
        if !effect.is_crop() {
            kept.push(effect);
            continue;
        }
        let bound_clip = effect.crop_clip_id().map(str::to_string);

        match bound_clip {
            Some(clip_id) => match bounds.get(&clip_id) {
                Some(&(start, end)) => {
                    if effect.start_time != start || effect.end_time != end {
                        effect.start_time = start;
                        effect.end_time = end;
                        report.snapped += 1;
                    }
                    kept.push(effect);
                }
                None => {
                    tracing::debug!(effect_id = %effect.id, %clip_id, "Removing orphaned crop");
                    report.removed.push(effect);
                }
            },
            None => {
                let best = candidates
                    .iter()
                    .map(|clip| (clip, clip.overlap_with(effect.start_time, effect.end_time)))
                    .filter(|(_, overlap)| *overlap > 0.0)
                    .fold(None, |best: Option<(&Clip, Millis)>, item| match best {
                        Some(b) if b.1 >= item.1 => Some(b),
                        _ => Some(item),
                    });

                if let Some((clip, _)) = best {
                    tracing::debug!(effect_id = %effect.id, clip_id = %clip.id, "Rebinding legacy crop");
                    if let EffectData::Crop(crop) = &mut effect.data {
                        crop.clip_id = Some(clip.id.clone());
                    }
                    effect.start_time = clip.start_time;
                    effect.end_time = clip.end_time();
                    report.rebound += 1;
                }
                kept.push(effect);
            }
        }
    }

    doc.effects = kept;
    report
}

/// Crop copy for `clip_id`. Its id is derived from the clip id, so
/// re-executing an edit with the same clip ids yields the same effect ids.
fn crop_copy(
    doc: &ProjectDocument,
    clip_id: &str,
    region: Region,
    enabled: bool,
    fallback: (Millis, Millis),
) -> Effect {
    let (start, end) = doc
        .clip(clip_id)
        .map(|c| (c.start_time, c.end_time()))
        .unwrap_or(fallback);
    let derived = format!("{CROP_ID_PREFIX}{clip_id}");
    let id = if doc.effect(&derived).is_some() {
        new_effect_id()
    } else {
        derived
    };
    let mut copy = Effect::crop(clip_id, region, start, end);
    copy.id = id;
    copy.enabled = enabled;
    copy
}

/// Copy the crop bound to `original_clip_id` onto each replacement clip and
/// remove the original. Returns the removed crop.
///
/// Used when a clip is split or segmented; the copies take their timing
/// from the next [`sync_crop_effects`] pass.
pub fn distribute_crop(
    doc: &mut ProjectDocument,
    original_clip_id: &str,
    new_clip_ids: &[String],
) -> Option<Effect> {
    let position = doc
        .effects
        .iter()
        .position(|e| e.crop_clip_id() == Some(original_clip_id))?;
    let original = doc.effects.remove(position);

    if let EffectData::Crop(crop) = &original.data {
        for (offset, clip_id) in new_clip_ids.iter().enumerate() {
            let copy = crop_copy(
                doc,
                clip_id,
                crop.region,
                original.enabled,
                (original.start_time, original.end_time),
            );
            doc.effects.insert(position + offset, copy);
        }
    }

    Some(original)
}

/// Give a duplicated clip its own copy of the source clip's crop.
/// Returns the new effect id.
pub fn duplicate_crop(
    doc: &mut ProjectDocument,
    source_clip_id: &str,
    new_clip_id: &str,
) -> Option<String> {
    let source = doc
        .effects
        .iter()
        .find(|e| e.crop_clip_id() == Some(source_clip_id))?;
    let EffectData::Crop(crop) = &source.data else {
        return None;
    };

    let copy = crop_copy(
        doc,
        new_clip_id,
        crop.region,
        source.enabled,
        (source.start_time, source.end_time),
    );
    let id = copy.id.clone();
    doc.effects.push(copy);
    Some(id)
}
