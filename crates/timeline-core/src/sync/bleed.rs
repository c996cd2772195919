//! Keep timeline-scoped effects from spilling onto newly inserted clips.

use recut_project_model::{Effect, EffectData, Millis, ProjectDocument};

/// Whether an effect of this payload would silently keep covering content
/// inserted in the middle of it.
fn truncates_at_insertion(data: &EffectData) -> bool {
    match data {
        EffectData::Zoom(_)
        | EffectData::Screen(_)
        | EffectData::Annotation(_)
        | EffectData::Plugin(_) => true,
        // Crops follow their clip, keystrokes are rebuilt, and the
        // background covers the whole project.
        EffectData::Crop(_) | EffectData::Keystroke(_) | EffectData::Background(_) => false,
    }
}

/// Cut every enabled timeline-scoped effect that spans `insert_start` so it
/// ends there. Returns the affected effects as they were before the cut.
pub fn truncate_bleeding_effects(doc: &mut ProjectDocument, insert_start: Millis) -> Vec<Effect> {
    let mut originals = vec![];
    for effect in doc.effects.iter_mut() {
        if effect.enabled
            && truncates_at_insertion(&effect.data)
            && effect.start_time < insert_start
            && effect.end_time > insert_start
        {
            originals.push(effect.clone());
            tracing::debug!(
                effect_id = %effect.id,
                kind = ?effect.kind(),
                from = effect.end_time,
                to = insert_start,
                "Truncating effect at inserted clip"
            );
            effect.end_time = insert_start;
        }
    }
    originals
}

#[cfg(test)]
mod tests {
    use super::*;
    use recut_project_model::{BackgroundData, ScreenData, ZoomData};

    fn zoom(id: &str, start: Millis, end: Millis) -> Effect {
        Effect::with_id(
            id,
            EffectData::Zoom(ZoomData {
                scale: 1.8,
                target: Default::default(),
                auto: true,
            }),
            start,
            end,
        )
    }

    #[test]
    fn test_spanning_effects_truncated() {
        let mut doc = ProjectDocument::new("bleed", 60);
        doc.effects.push(zoom("spans", 1000.0, 5000.0));
        doc.effects.push(zoom("before", 0.0, 2000.0));
        doc.effects.push(zoom("after", 3000.0, 4000.0));
        doc.effects.push(Effect::with_id(
            "screen",
            EffectData::Screen(ScreenData {
                preset: "tilt".into(),
                tilt_deg: 8.0,
            }),
            0.0,
            9000.0,
        ));

        let originals = truncate_bleeding_effects(&mut doc, 2500.0);
        assert_eq!(originals.len(), 2);
        assert_eq!(doc.effect("spans").unwrap().end_time, 2500.0);
        assert_eq!(doc.effect("screen").unwrap().end_time, 2500.0);
        assert_eq!(doc.effect("before").unwrap().end_time, 2000.0);
        assert_eq!(doc.effect("after").unwrap().end_time, 4000.0);
        assert_eq!(originals[0].end_time, 5000.0);
    }

    #[test]
    fn test_disabled_and_background_effects_untouched() {
        let mut doc = ProjectDocument::new("bleed", 60);
        let mut disabled = zoom("off", 0.0, 5000.0);
        disabled.enabled = false;
        doc.effects.push(disabled);
        doc.effects.push(Effect::with_id(
            "bg",
            EffectData::Background(BackgroundData {
                color: "#000000".into(),
                padding: 40,
            }),
            0.0,
            5000.0,
        ));

        assert!(truncate_bleeding_effects(&mut doc, 1000.0).is_empty());
        assert_eq!(doc.effect("off").unwrap().end_time, 5000.0);
        assert_eq!(doc.effect("bg").unwrap().end_time, 5000.0);
    }
}
