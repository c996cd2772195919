//! Rebuild keystroke overlays from keyboard captures.

use anyhow::bail;
use recut_common::AppConfig;

use super::{format_ms, open_editor, save_project};
use crate::EditArgs;

pub fn run(config: &AppConfig, args: EditArgs) -> anyhow::Result<()> {
    if args.metadata.is_empty() {
        bail!("No keyboard captures given; pass --metadata RECORDING_ID=PATH");
    }

    let editor = open_editor(config, &args)?;
    match editor.metadata().len() {
        0 => bail!("None of the keyboard captures could be loaded"),
        n => println!("Loaded {n} keyboard capture(s)"),
    }

    // Loading already rebuilt; report what is on the timeline now.
    let keystrokes: Vec<_> = editor
        .document()
        .effects
        .iter()
        .filter(|e| e.is_keystroke())
        .collect();
    println!("Keystroke overlays: {}", keystrokes.len());
    for effect in keystrokes {
        println!(
            "  {} [{} - {}]{}",
            effect.id,
            format_ms(effect.start_time),
            format_ms(effect.end_time),
            if effect.enabled { "" } else { " (disabled)" }
        );
    }

    let missing: Vec<&str> = editor
        .document()
        .recordings
        .iter()
        .map(|r| r.id.as_str())
        .filter(|id| !editor.metadata().is_loaded(id))
        .collect();
    if !missing.is_empty() {
        // Overlays are only rebuilt once every recording has metadata.
        println!("Recordings without captures: {}", missing.join(", "));
    }

    save_project(&editor, &args)
}
