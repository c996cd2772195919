//! Single-clip edits: split, trim, duplicate, delete.

use recut_common::AppConfig;
use recut_timeline_core::{AppliedEdit, TimelineEditor};

use super::{format_ms, open_editor, save_project};
use crate::EditArgs;

fn finish(editor: &TimelineEditor, args: &EditArgs, edit: &AppliedEdit) -> anyhow::Result<()> {
    println!("{}: {}", edit.label(), edit.affected_clip_ids.join(", "));
    for clip_id in &edit.affected_clip_ids {
        if let Some(clip) = editor.document().clip(clip_id) {
            println!(
                "  {} [{} - {}]",
                clip.id,
                format_ms(clip.start_time),
                format_ms(clip.end_time())
            );
        }
    }
    println!("Duration: {}", format_ms(editor.document().duration_ms));
    save_project(editor, args)
}

pub fn split(config: &AppConfig, args: EditArgs, clip: String, at: f64) -> anyhow::Result<()> {
    let mut editor = open_editor(config, &args)?;
    let edit = editor.split(&clip, at)?;
    finish(&editor, &args, &edit)
}

pub fn trim_start(config: &AppConfig, args: EditArgs, clip: String, to: f64) -> anyhow::Result<()> {
    let mut editor = open_editor(config, &args)?;
    let edit = editor.trim_start(&clip, to)?;
    finish(&editor, &args, &edit)
}

pub fn trim_end(config: &AppConfig, args: EditArgs, clip: String, to: f64) -> anyhow::Result<()> {
    let mut editor = open_editor(config, &args)?;
    let edit = editor.trim_end(&clip, to)?;
    finish(&editor, &args, &edit)
}

pub fn duplicate(config: &AppConfig, args: EditArgs, clip: String) -> anyhow::Result<()> {
    let mut editor = open_editor(config, &args)?;
    let edit = editor.duplicate(&clip)?;
    finish(&editor, &args, &edit)
}

pub fn delete(config: &AppConfig, args: EditArgs, clip: String) -> anyhow::Result<()> {
    let mut editor = open_editor(config, &args)?;
    let edit = editor.delete(&clip)?;
    finish(&editor, &args, &edit)
}
