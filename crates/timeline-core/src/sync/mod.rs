//! Effect-clip synchronization.
//!
//! - [`crop`]: crop effects follow their bound clip
//! - [`keystroke`]: keystroke overlays are rebuilt from keyboard metadata
//! - [`bleed`]: timeline-scoped effects stop at inserted clips
//! - [`legacy_ids`]: recognition of keystroke ids from older documents

pub mod bleed;
pub mod crop;
pub mod keystroke;
pub mod legacy_ids;

pub use bleed::truncate_bleeding_effects;
pub use crop::{distribute_crop, duplicate_crop, sync_crop_effects, CropSyncReport};
pub use keystroke::{rebuild_keystroke_effects, RebuildOutcome};

use recut_project_model::{Effect, ProjectDocument};

/// Remove effects whose timing is non-finite, negative, or inverted.
/// Returns the dropped effects.
pub fn drop_invalid_effects(doc: &mut ProjectDocument) -> Vec<Effect> {
    let (valid, invalid): (Vec<Effect>, Vec<Effect>) = std::mem::take(&mut doc.effects)
        .into_iter()
        .partition(Effect::has_valid_timing);
    for effect in &invalid {
        tracing::warn!(
            effect_id = %effect.id,
            start = effect.start_time,
            end = effect.end_time,
            "Dropping effect with invalid timing"
        );
    }
    doc.effects = valid;
    invalid
}

#[cfg(test)]
mod tests {
    use super::*;
    use recut_project_model::Region;

    #[test]
    fn test_drop_invalid_effects_keeps_order() {
        let mut doc = ProjectDocument::new("hygiene", 60);
        doc.effects.push(Effect::crop("a", Region::FULL, 0.0, 100.0));
        doc.effects.push(Effect::crop("b", Region::FULL, f64::NAN, 100.0));
        doc.effects.push(Effect::crop("c", Region::FULL, 50.0, 40.0));
        doc.effects.push(Effect::crop("d", Region::FULL, 100.0, 200.0));

        let dropped = drop_invalid_effects(&mut doc);
        assert_eq!(dropped.len(), 2);
        let kept: Vec<_> = doc.effects.iter().filter_map(|e| e.crop_clip_id()).collect();
        assert_eq!(kept, vec!["a", "d"]);
    }
}
