//! Edit history (undo/redo) for the chip field.
//!
//! Every public mutation of the field is recorded as one operation: the text
//! difference plus the chip state before and after, so undoing a chip commit
//! restores both the typed text and the spans in one step.

use crate::chip::{Chip, ChipId};
use crate::registry::SpanRegistry;
use crate::render::VisualHandle;
use crate::selection::Selection;

/// Chip state around an edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSnapshot {
    pub registry: SpanRegistry,
    pub selection: Selection,
    pub selected_chip: Option<ChipId>,
    /// Chips hidden behind the more marker with their buffer text
    pub hidden: Vec<(Chip, String)>,
    pub more_visual: Option<VisualHandle>,
}

/// A single edit operation that can be undone/redone.
#[derive(Debug, Clone)]
pub struct EditOperation {
    /// Character offset where the edit occurred
    pub offset: usize,
    /// Text that was deleted (empty for pure inserts)
    pub deleted_text: String,
    /// Text that was inserted (empty for pure deletes)
    pub inserted_text: String,
    pub before: FieldSnapshot,
    pub after: FieldSnapshot,
}

impl EditOperation {
    /// Build an operation from the full text before and after a mutation.
    /// Only the differing middle part is stored.
    pub fn from_change(
        text_before: &str,
        text_after: &str,
        before: FieldSnapshot,
        after: FieldSnapshot,
    ) -> Self {
        let old: Vec<char> = text_before.chars().collect();
        let new: Vec<char> = text_after.chars().collect();

        let prefix = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        Self {
            offset: prefix,
            deleted_text: old[prefix..old.len() - suffix].iter().collect(),
            inserted_text: new[prefix..new.len() - suffix].iter().collect(),
            before,
            after,
        }
    }

    /// Whether the operation changed anything at all
    pub fn is_noop(&self) -> bool {
        self.deleted_text.is_empty() && self.inserted_text.is_empty() && self.before == self.after
    }

    /// Get the inverse operation for undo
    pub fn inverse(&self) -> Self {
        Self {
            offset: self.offset,
            deleted_text: self.inserted_text.clone(),
            inserted_text: self.deleted_text.clone(),
            before: self.after.clone(),
            after: self.before.clone(),
        }
    }
}

/// Edit history with undo/redo stacks.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    undo_stack: Vec<EditOperation>,
    redo_stack: Vec<EditOperation>,
    max_size: usize,
}

impl EditHistory {
    /// Create a new edit history with default max size
    pub fn new() -> Self {
        Self::with_max_size(100)
    }

    /// Create a new edit history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Push an operation onto the undo stack (clears redo stack)
    pub fn push(&mut self, op: EditOperation) {
        self.redo_stack.clear();
        self.undo_stack.push(op);

        // Trim if exceeded max size
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Pop an operation from the undo stack (moves to redo stack)
    pub fn pop_undo(&mut self) -> Option<EditOperation> {
        let op = self.undo_stack.pop()?;
        self.redo_stack.push(op.inverse());
        Some(op)
    }

    /// Pop an operation from the redo stack (moves to undo stack)
    pub fn pop_redo(&mut self) -> Option<EditOperation> {
        let op = self.redo_stack.pop()?;
        self.undo_stack.push(op.inverse());
        Some(op)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
