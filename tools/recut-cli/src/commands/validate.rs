//! Validate a project document against the timeline invariants.

use recut_common::AppConfig;
use recut_project_model::ProjectDocument;
use recut_timeline_core::reflow::{check_contiguity, project_duration, DURATION_TOLERANCE_MS};
use recut_timeline_core::time_space::{is_valid_playback_rate, timeline_duration};

use super::{load_project, open_editor, save_project};
use crate::EditArgs;

/// Collect human-readable invariant violations.
fn find_issues(doc: &ProjectDocument) -> Vec<String> {
    let mut issues = vec![];

    for track in &doc.tracks {
        for issue in check_contiguity(track) {
            issues.push(format!(
                "{:?} track: clip {} (#{}) starts at {}ms, expected {}ms",
                track.kind, issue.clip_id, issue.index, issue.actual_start, issue.expected_start
            ));
        }

        for clip in &track.clips {
            if !is_valid_playback_rate(clip.playback_rate) {
                issues.push(format!("Clip {}: invalid playback rate {}", clip.id, clip.playback_rate));
            }
            let expected = timeline_duration(clip);
            if (clip.duration - expected).abs() > DURATION_TOLERANCE_MS {
                issues.push(format!(
                    "Clip {}: duration {}ms does not match its window ({}ms)",
                    clip.id, clip.duration, expected
                ));
            }
            match doc.recording(&clip.recording_id) {
                None => issues.push(format!(
                    "Clip {}: unknown recording {}",
                    clip.id, clip.recording_id
                )),
                Some(recording) if clip.source_out > recording.duration_ms => {
                    issues.push(format!(
                        "Clip {}: source out {}ms is past the end of {} ({}ms)",
                        clip.id, clip.source_out, recording.id, recording.duration_ms
                    ))
                }
                Some(_) => {}
            }
        }
    }

    for effect in &doc.effects {
        if !effect.has_valid_timing() {
            issues.push(format!(
                "Effect {}: invalid timing {}..{}",
                effect.id, effect.start_time, effect.end_time
            ));
        }
        if let Some(clip_id) = effect.crop_clip_id() {
            if !doc.contains_clip(clip_id) {
                issues.push(format!("Crop {}: bound clip {} is gone", effect.id, clip_id));
            }
        }
    }

    let duration = project_duration(doc);
    if (doc.duration_ms - duration).abs() > DURATION_TOLERANCE_MS {
        issues.push(format!(
            "Project duration {}ms, expected {}ms",
            doc.duration_ms, duration
        ));
    }

    issues
}

pub fn run(config: &AppConfig, args: EditArgs, fix: bool) -> anyhow::Result<()> {
    println!("Validating project at: {}", args.project.display());

    let doc = load_project(&args.project)?;
    println!("  Name: {}", doc.name);
    println!("  Version: {}", doc.version);
    println!("  Clips: {}", doc.clip_count());
    println!("  Effects: {}", doc.effects.len());

    let issues = find_issues(&doc);
    if issues.is_empty() {
        println!("\nProject is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for issue in &issues {
        println!("  - {issue}");
    }
    println!("\n{} issue(s) found.", issues.len());

    if !fix {
        println!("Run with --fix to repair.");
        return Ok(());
    }

    let editor = open_editor(config, &args)?;
    let remaining = find_issues(editor.document());
    if remaining.is_empty() {
        println!("All issues repaired.");
    } else {
        println!("{} issue(s) could not be repaired:", remaining.len());
        for issue in &remaining {
            println!("  - {issue}");
        }
    }
    save_project(&editor, &args)
}
