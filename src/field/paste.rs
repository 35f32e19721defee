//! Clipboard paste: completed tokens in pasted text become chips.

use super::ChipsField;
use crate::buffer::TextBufferMut;
use crate::chip::ChipId;
use crate::tasks::Task;
use crate::tokenizer::{self, COMMIT_CHAR_SPACE};

impl<B: TextBufferMut> ChipsField<B> {
    /// Paste `text` over the current selection and commit every completed
    /// token in it. A trailing fragment without a commit character stays as
    /// editable text. Returns the chips created.
    pub fn paste(&mut self, text: &str) -> Vec<ChipId> {
        if text.is_empty() {
            return Vec::new();
        }
        self.record(|field| {
            if field.selected_chip.is_some() {
                field.clear_selected_chip();
            }
            field.watching = false;
            let range = field.selection.start()..field.selection.end();
            field.splice(range, text);
            let created = if field.no_chips {
                Vec::new()
            } else {
                field.handle_paste()
            };
            tracing::debug!(created = created.len(), "paste handled");
            field.tasks.post(Task::ResumeWatching);
            created
        })
    }

    fn handle_paste(&mut self) -> Vec<ChipId> {
        let text = self.buffer.content();
        let caret = self.caret();
        let last_token_start = self.tokenizer.find_token_start(&text, caret);
        let last_address = self.buffer.slice(last_token_start..caret);
        // Characters from the last token on are never touched by the interior
        // commits, so the boundary is tracked from the end of the buffer.
        let tail = self.buffer.len_chars() - last_token_start;

        let mut start = self.first_unchipped_token(last_token_start);
        let mut created = Vec::new();
        while start < self.buffer.len_chars().saturating_sub(tail) {
            let text = self.buffer.content();
            let token_end = self.tokenizer.find_token_end(&text, start);
            let end = tokenizer::move_past_terminators(&text, token_end);
            if end <= start || !self.commit_chip(start, end) {
                break;
            }
            let Some(id) = self.registry.find_chip(start) else {
                break;
            };
            let Some(range) = self.registry.chip_range(id) else {
                break;
            };
            created.push(id);
            start = range.end + 1;
        }

        if tokenizer::is_completed_token(self.tokenizer.as_ref(), &last_address) {
            let Some(found) = self.buffer.find(&last_address, start) else {
                tracing::warn!(token = %last_address, "pasted token vanished before commit");
                return created;
            };
            let len = self.buffer.len_chars();
            self.commit_chip(found, len);
            if let Some(id) = self.registry.find_chip(found) {
                created.push(id);
            }
        }
        created
    }

    /// Walk back from `token_start` over earlier tokens until one already
    /// holds a chip. Returns the start of the first token after it.
    fn first_unchipped_token(&self, token_start: usize) -> usize {
        let text = self.buffer.content();
        let mut start = token_start;
        while start > 0 {
            let prev = self.tokenizer.find_token_start(&text, start - 1);
            if prev >= start || self.registry.find_chip(prev).is_some() {
                break;
            }
            start = prev;
        }
        while self.buffer.char_at(start) == Some(COMMIT_CHAR_SPACE) {
            start += 1;
        }
        start
    }
}
