//! Reacting to host edits of the buffer.

use std::ops::Range;

use super::ChipsField;
use crate::buffer::TextBufferMut;
use crate::selection::Selection;
use crate::tokenizer::{self, COMMIT_CHAR_SPACE};

impl<B: TextBufferMut> ChipsField<B> {
    /// The host is about to replace `range` of the buffer. Captures the state
    /// needed to undo the edit together with whatever the field does in
    /// response.
    pub fn before_change(&mut self, range: Range<usize>) {
        tracing::trace!(?range, "before change");
        self.begin_record();
    }

    /// The host replaced `deleted` characters at `range.start` with `inserted`
    /// characters (now at `range`).
    pub fn after_change(&mut self, range: Range<usize>, inserted: usize, deleted: usize) {
        let start = range.start;
        debug_assert_eq!(range.end - range.start, inserted);
        self.shift(start, deleted, inserted);
        if self.watching {
            self.on_text_changed(deleted, inserted);
            self.after_text_changed();
        }
        self.end_record();
    }

    /// Replace `range` with `text` through the host edit protocol. The caret
    /// ends up after the inserted text.
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let len = self.buffer.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        let inserted = text.chars().count();
        self.before_change(start..end);
        self.selection = Selection::collapsed(start);
        self.buffer.replace(start..end, text);
        self.after_change(start..start + inserted, inserted, end - start);
    }

    /// Insert `text` at the caret, replacing any selected text.
    pub fn insert_text(&mut self, text: &str) {
        let range = self.selection.start()..self.selection.end();
        self.replace(range, text);
    }

    pub fn type_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf));
    }

    /// Backspace. With a selected chip the whole chip goes.
    pub fn delete_backward(&mut self) {
        if let Some(id) = self.selected_chip {
            self.record(|field| field.remove_chip_internal(id));
            return;
        }
        if !self.selection.is_empty() {
            self.replace(self.selection.start()..self.selection.end(), "");
        } else if self.caret() > 0 {
            let caret = self.caret();
            self.replace(caret - 1..caret, "");
        }
    }

    /// External caret/selection change. A caret placed inside the chips or
    /// the more marker is moved to just after the last of them.
    pub fn on_selection_changed(&mut self, start: usize, end: usize) {
        let len = self.buffer.len_chars();
        let chips_end = self.registry.last().map(|(_, last)| last.end);
        let more_end = self.registry.more().map(|more| more.end);
        if let Some(limit) = chips_end.max(more_end) {
            if start < limit {
                self.set_caret((limit + 1).min(len));
                return;
            }
        }
        self.selection = Selection::new(start.min(len), end.min(len));
    }

    fn on_text_changed(&mut self, deleted: usize, inserted: usize) {
        // A single deleted character next to a chip takes the whole chip
        if deleted == inserted + 1 {
            let caret = self.selection.start();
            let Some(&id) = self.registry.intersecting(caret, caret).first() else {
                return;
            };
            let text = self.buffer.content();
            let token_start = self.tokenizer.find_token_start(&text, caret);
            let token_end = (self.tokenizer.find_token_end(&text, token_start) + 1)
                .min(self.buffer.len_chars());
            tracing::debug!(chip = %id, token_start, token_end, "deleting chip under caret");
            self.registry.remove(id);
            if token_start < token_end {
                self.splice(token_start..token_end, "");
            }
            self.temporary.retain(|t| *t != id);
        }
    }

    fn after_text_changed(&mut self) {
        if self.buffer.is_empty() {
            self.registry.clear();
            self.selected_chip = None;
            self.more_visual = None;
            self.hidden.clear();
            self.temporary.clear();
            self.dismiss_suggestions();
            return;
        }
        if self.chips_pending() {
            return;
        }
        if self.selected_chip.is_some() {
            let len = self.buffer.len_chars();
            self.set_caret(len);
            self.clear_selected_chip();
        }

        let len = self.buffer.len_chars();
        if len > 1 {
            let last = self.char_before_caret();
            if last.is_some_and(tokenizer::is_commit_char) {
                self.commit_by_character();
                return;
            }
            if last == Some(COMMIT_CHAR_SPACE) && !self.is_pass_through() {
                let text = self.buffer.content();
                let token_start = self.tokenizer.find_token_start(&text, self.caret());
                let token_end = self.tokenizer.find_token_end(&text, token_start);
                let token = self.buffer.slice(token_start..token_end);
                if !token.is_empty() && self.validator.is_some() && self.is_valid(&token) {
                    self.commit_by_character();
                    return;
                }
            }
        }
        self.perform_filtering();
    }

    /// Character just before the caret (the first character when the caret
    /// is at the start).
    fn char_before_caret(&self) -> Option<char> {
        let caret = self.caret();
        self.buffer.char_at(caret.saturating_sub(1))
    }

    /// Chips are pending while a batch pass is queued or chips are hidden
    /// behind the more marker.
    pub(super) fn chips_pending(&self) -> bool {
        !self.pending.is_empty() || !self.hidden.is_empty()
    }

    /// Filter suggestions on the token ending at the caret, unless it is
    /// completed or already a chip.
    fn perform_filtering(&mut self) {
        if self.suggestions.is_none() {
            return;
        }
        let text = self.buffer.content();
        if tokenizer::is_completed_token(self.tokenizer.as_ref(), &text) {
            return;
        }
        if !self.enough_to_filter() {
            self.dismiss_suggestions();
            return;
        }
        let end = self.caret();
        let start = self.tokenizer.find_token_start(&text, end);
        if !self.registry.intersecting(start, end).is_empty() {
            return;
        }
        let query = self.buffer.slice(start..end);
        if let Some(suggestions) = self.suggestions.as_mut() {
            suggestions.filter(&query);
        }
    }
}
