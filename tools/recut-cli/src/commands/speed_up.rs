//! Speed up typing and idle stretches found in keyboard captures.

use anyhow::{bail, Context};
use recut_common::AppConfig;
use recut_timeline_core::activity::KeyboardActivityAnalyzer;
use recut_timeline_core::services::EffectGenerator;
use recut_timeline_core::{AppliedEdit, SpeedUpKind};

use super::{format_ms, open_editor, save_project, SpeedUpKindArg};
use crate::EditArgs;

pub fn run(
    config: &AppConfig,
    args: EditArgs,
    clip: Option<String>,
    kinds: Vec<SpeedUpKindArg>,
) -> anyhow::Result<()> {
    if args.metadata.is_empty() {
        bail!("Speed-ups need keyboard activity; pass --metadata RECORDING_ID=PATH");
    }
    let kinds: Vec<SpeedUpKind> = kinds.into_iter().map(SpeedUpKind::from).collect();
    let analyzer = KeyboardActivityAnalyzer::with_defaults();
    let mut editor = open_editor(config, &args)?;

    let applied: Vec<AppliedEdit> = match clip {
        Some(clip_id) => {
            let target = editor
                .document()
                .clip(&clip_id)
                .with_context(|| format!("Clip not found: {clip_id}"))?;
            let recording = editor
                .document()
                .recording(&target.recording_id)
                .with_context(|| format!("Unknown recording {}", target.recording_id))?;
            let metadata = editor
                .metadata()
                .get(&recording.id)
                .with_context(|| format!("No keyboard capture for {}", recording.id))?;
            let periods = analyzer.suggest_speed_ups(recording, metadata)?;
            println!("Suggested periods: {}", periods.len());
            vec![editor.speed_up(&clip_id, periods, kinds)?]
        }
        None => editor.apply_suggested_speed_ups(&analyzer, &kinds)?,
    };

    if applied.is_empty() {
        println!("Nothing to speed up.");
        return Ok(());
    }

    for edit in &applied {
        println!("{}: {} segment(s)", edit.label(), edit.affected_clip_ids.len());
        for clip_id in &edit.affected_clip_ids {
            if let Some(clip) = editor.document().clip(clip_id) {
                println!(
                    "  {} [{} - {}] x{:.2}",
                    clip.id,
                    format_ms(clip.start_time),
                    format_ms(clip.end_time()),
                    clip.playback_rate
                );
            }
        }
    }
    println!("Duration: {}", format_ms(editor.document().duration_ms));
    save_project(&editor, &args)
}
