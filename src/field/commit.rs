//! Committing tokens into chips, key actions and the sanitizer passes.

use super::ChipsField;
use crate::buffer::TextBufferMut;
use crate::entry::{self, Entry};
use crate::sanitize;
use crate::tokenizer::{self, COMMIT_CHAR_COMMA, COMMIT_CHAR_SEMICOLON};

impl<B: TextBufferMut> ChipsField<B> {
    /// Done/Enter action. Commits the token at the caret, or unselects the
    /// selected chip. Returns false when nothing was done and the host should
    /// move focus on.
    pub fn on_done_action(&mut self) -> bool {
        self.record(|field| {
            if field.commit_default() {
                return true;
            }
            if field.selected_chip.is_some() {
                field.clear_selected_chip();
                return true;
            }
            false
        })
    }

    /// Tab key: unselect the selected chip or commit the token at the caret.
    pub fn on_tab(&mut self) {
        self.record(|field| {
            if field.selected_chip.is_some() {
                field.clear_selected_chip();
            } else {
                field.commit_default();
            }
        });
    }

    /// Back key: dismisses a selected chip. Returns whether it was consumed.
    pub fn on_back(&mut self) -> bool {
        if self.selected_chip.is_none() {
            return false;
        }
        self.record(|field| field.clear_selected_chip());
        true
    }

    /// An item was chosen from the suggestion list. `None` is ignored.
    pub fn on_item_chosen(&mut self, item: Option<&Entry>) {
        let Some(item) = item else {
            tracing::debug!("null suggestion selection ignored");
            return;
        };
        self.record(|field| field.submit_item(item));
    }

    /// Token length before the caret is at least the threshold.
    pub(super) fn enough_to_filter(&self) -> bool {
        let text = self.buffer.content();
        let end = self.caret();
        let start = self.tokenizer.find_token_start(&text, end);
        end.saturating_sub(start) >= self.config.threshold
    }

    pub(super) fn already_has_chip(&self, start: usize, end: usize) -> bool {
        self.no_chips || !self.registry.intersecting(start, end).is_empty()
    }

    fn should_create_chip(&self, start: usize, end: usize) -> bool {
        !self.no_chips && self.focused && self.enough_to_filter() && !self.already_has_chip(start, end)
    }

    /// Commit the token at the caret. If the caret sits inside a token, the
    /// whole token is committed as an edit. Returns whether a chip was made.
    pub(super) fn commit_default(&mut self) -> bool {
        let text = self.buffer.content();
        let end = self.caret();
        let start = self.tokenizer.find_token_start(&text, end);
        if !self.should_create_chip(start, end) {
            return false;
        }
        let token_end = self.tokenizer.find_token_end(&text, start);
        let what_end = tokenizer::move_past_terminators(&text, token_end);
        if what_end != end {
            self.handle_edit(start, what_end);
            return true;
        }
        self.commit_chip(start, end)
    }

    pub(super) fn commit_by_character(&mut self) {
        let text = self.buffer.content();
        let end = self.caret();
        let start = self.tokenizer.find_token_start(&text, end);
        if self.should_create_chip(start, end) {
            self.commit_chip(start, end);
        }
        let len = self.buffer.len_chars();
        self.set_caret(len);
    }

    /// Replace `[start, end)` with a chip for the token starting at `start`.
    ///
    /// When suggestions are showing, the token is long enough to filter, the
    /// caret is at `end` and the source is not pass-through, the first
    /// suggestion wins over the typed text.
    pub(super) fn commit_chip(&mut self, start: usize, end: usize) -> bool {
        let has_suggestions = self.suggestions.as_ref().is_some_and(|s| s.count() > 0);
        if has_suggestions
            && self.enough_to_filter()
            && end == self.caret()
            && !self.is_pass_through()
        {
            let first = self.suggestions.as_ref().and_then(|s| s.item(0));
            if let Some(first) = first {
                tracing::debug!(title = first.title(), "committing first suggestion");
                self.submit_item(&first);
            }
            self.dismiss_suggestions();
            return true;
        }

        let text = self.buffer.content();
        let mut token_end = self.tokenizer.find_token_end(&text, start);
        if let Some(next) = self.buffer.char_at(token_end + 1) {
            if next == COMMIT_CHAR_COMMA || next == COMMIT_CHAR_SEMICOLON {
                token_end += 1;
            }
        }
        let token = self.buffer.slice(start..token_end);
        let token = token.trim();
        if token.is_empty() {
            return false;
        }
        if let Some(entry) = entry::create_tokenized_entry(token, self.validator.as_deref()) {
            if !entry.is_valid() {
                tracing::debug!(token, "token failed validation, keeping it as an editable chip");
            }
            self.put_chip(start..end, entry);
        }
        if end == self.caret() {
            self.dismiss_suggestions();
        }
        self.sanitize_between();
        true
    }

    /// The caret is inside a committed token: rebuild `[start, end)` as one
    /// chip.
    pub(super) fn handle_edit(&mut self, start: usize, end: usize) {
        self.set_caret(end);
        let text = self.buffer.slice(start..end);
        if !text.is_empty() {
            let entry = Entry::generate_tokenized_entry(&text);
            let sel_end = self.caret();
            self.put_chip(start..sel_end, entry);
        }
        self.dismiss_suggestions();
    }

    /// Replace the token at the caret with a chip for `item`.
    pub(super) fn submit_item(&mut self, item: &Entry) {
        let Some(entry) = entry::create_validated_entry(item, self.validator.as_deref()) else {
            return;
        };
        let text = self.buffer.content();
        let end = self.caret();
        let start = self.tokenizer.find_token_start(&text, end);
        self.put_chip(start..end, entry);
        self.sanitize_between();
        self.force_notify = true;
    }

    /// Delete text after the last chip beyond its trailing space.
    pub(super) fn sanitize_end(&mut self) {
        if !self.pending.is_empty() {
            return;
        }
        if let Some(range) = sanitize::trailing_excess(&self.buffer, &self.registry) {
            tracing::debug!(?range, "removing characters after the last chip");
            self.splice(range, "");
        }
    }

    /// Collapse the text between adjacent chips to a single space.
    pub(super) fn sanitize_between(&mut self) {
        if !self.pending.is_empty() {
            return;
        }
        for range in sanitize::gap_excess(&self.buffer, &self.registry) {
            tracing::debug!(?range, "removing characters between chips");
            self.splice(range, "");
        }
    }
}
