//! Show project information.

use std::path::PathBuf;

use recut_project_model::{EffectKind, ProjectDocument};
use serde::Serialize;

use super::{format_ms, load_project};

#[derive(Debug, Serialize)]
struct ProjectSummary {
    name: String,
    id: String,
    version: String,
    fps: u32,
    duration_ms: f64,
    recordings: usize,
    tracks: Vec<TrackSummary>,
    effects: usize,
    keystroke_effects: usize,
    crop_effects: usize,
}

#[derive(Debug, Serialize)]
struct TrackSummary {
    kind: String,
    clips: usize,
    end_ms: f64,
}

impl ProjectSummary {
    fn of(doc: &ProjectDocument) -> Self {
        Self {
            name: doc.name.clone(),
            id: doc.id.clone(),
            version: doc.version.clone(),
            fps: doc.settings.fps,
            duration_ms: doc.duration_ms,
            recordings: doc.recordings.len(),
            tracks: doc
                .tracks
                .iter()
                .map(|t| TrackSummary {
                    kind: format!("{:?}", t.kind).to_lowercase(),
                    clips: t.clips.len(),
                    end_ms: t.end_time(),
                })
                .collect(),
            effects: doc.effects.len(),
            keystroke_effects: doc
                .effects
                .iter()
                .filter(|e| e.kind() == EffectKind::Keystroke)
                .count(),
            crop_effects: doc.effects.iter().filter(|e| e.is_crop()).count(),
        }
    }
}

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let doc = load_project(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ProjectSummary::of(&doc))?);
        return Ok(());
    }

    println!("Project: {}", doc.name);
    println!("  ID: {}", doc.id);
    println!("  Version: {}", doc.version);
    println!("  Created: {}", doc.created_at);
    println!("  Modified: {}", doc.modified_at);
    println!("  FPS: {}", doc.settings.fps);
    println!("  Duration: {}", format_ms(doc.duration_ms));
    println!();

    println!("Recordings:");
    for recording in &doc.recordings {
        println!(
            "  {}: {} ({})",
            recording.id,
            format_ms(recording.duration_ms),
            recording.path.as_deref().unwrap_or("no media path")
        );
    }
    println!();

    println!("Tracks:");
    for track in &doc.tracks {
        println!("  {:?}: {} clip(s)", track.kind, track.clips.len());
        for clip in &track.clips {
            let mut flags = vec![];
            if clip.typing_speed_applied {
                flags.push("typing");
            }
            if clip.idle_speed_applied {
                flags.push("idle");
            }
            println!(
                "    {} [{} - {}] src {:.0}-{:.0}ms x{}{}",
                clip.id,
                format_ms(clip.start_time),
                format_ms(clip.end_time()),
                clip.source_in,
                clip.source_out,
                clip.playback_rate,
                if flags.is_empty() {
                    String::new()
                } else {
                    format!(" (sped up: {})", flags.join(", "))
                }
            );
        }
    }
    println!();

    println!("Effects: {}", doc.effects.len());
    for effect in &doc.effects {
        println!(
            "  {} {:?} [{} - {}]{}",
            effect.id,
            effect.kind(),
            format_ms(effect.start_time),
            format_ms(effect.end_time),
            if effect.enabled { "" } else { " (disabled)" }
        );
    }

    Ok(())
}
