//! Command-based undo/redo history.
//!
//! - Undo/redo stacks of [`AppliedEdit`]
//! - Pushing a new edit clears the redo stack (new branch)
//! - Configurable maximum depth, oldest entries evicted first
//!
//! The history only stores edits; [`TimelineEditor`](crate::TimelineEditor)
//! applies their inverses and re-executes their commands.

use crate::command::AppliedEdit;

/// Default number of undo steps kept.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Manages undo/redo stacks of applied edits.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<AppliedEdit>,
    redo_stack: Vec<AppliedEdit>,
    max_entries: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl EditHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries,
        }
    }

    /// Record a freshly applied edit. Clears the redo stack.
    pub fn push(&mut self, edit: AppliedEdit) {
        self.redo_stack.clear();
        self.push_undo(edit);
        tracing::debug!(undo_depth = self.undo_stack.len(), "History entry pushed");
    }

    fn push_undo(&mut self, edit: AppliedEdit) {
        self.undo_stack.push(edit);
        if self.undo_stack.len() > self.max_entries {
            let excess = self.undo_stack.len() - self.max_entries;
            self.undo_stack.drain(..excess);
        }
    }

    /// Take the edit to undo next.
    pub fn pop_undo(&mut self) -> Option<AppliedEdit> {
        let edit = self.undo_stack.pop()?;
        tracing::debug!(
            label = edit.label(),
            undo_remaining = self.undo_stack.len(),
            "Undo"
        );
        Some(edit)
    }

    /// Store an edit whose inverse has been applied.
    pub fn push_redo(&mut self, edit: AppliedEdit) {
        self.redo_stack.push(edit);
    }

    /// Take the edit to redo next.
    pub fn pop_redo(&mut self) -> Option<AppliedEdit> {
        let edit = self.redo_stack.pop()?;
        tracing::debug!(
            label = edit.label(),
            redo_remaining = self.redo_stack.len(),
            "Redo"
        );
        Some(edit)
    }

    /// Store a re-executed edit without touching the redo stack.
    pub fn push_redone(&mut self, edit: AppliedEdit) {
        self.push_undo(edit);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the edit that would be undone next.
    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo_stack.last().map(AppliedEdit::label)
    }

    /// Label of the edit that would be redone next.
    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo_stack.last().map(AppliedEdit::label)
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        tracing::debug!("History cleared");
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Change the depth limit, evicting the oldest entries if needed.
    pub fn set_max_entries(&mut self, max: usize) {
        self.max_entries = max;
        if self.undo_stack.len() > max {
            let excess = self.undo_stack.len() - max;
            self.undo_stack.drain(..excess);
        }
    }
}
