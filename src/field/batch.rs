//! Programmatic appends, the deferred pending pass, sizing and focus.

use super::ChipsField;
use crate::buffer::TextBufferMut;
use crate::chip::Chip;
use crate::config::FocusBehavior;
use crate::entry::{self, Entry};
use crate::pending;
use crate::tasks::Task;
use crate::tokenizer::COMMIT_CHAR_COMMA;

impl<B: TextBufferMut> ChipsField<B> {
    /// Append `text` at the end of the buffer and queue it for the next
    /// pending pass. A separator is added when the text lacks one.
    pub fn append(&mut self, text: &str) {
        self.record(|field| {
            field.watching = false;
            let fragment = pending::terminated_fragment(text);
            let appended = fragment.clone().unwrap_or_else(|| text.to_string());
            let len = field.buffer.len_chars();
            field.splice(len..len, &appended);
            if let Some(fragment) = fragment {
                field.pending.push(fragment);
            }
            if !field.pending.is_empty() {
                field.tasks.post(Task::HandlePendingChips);
            }
            field.tasks.post(Task::ResumeWatching);
        });
    }

    /// The host view was laid out with `width`. Runs the pending pass when
    /// chips are waiting, otherwise re-renders chips wider than the field.
    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        if width == 0 {
            return;
        }
        if !self.pending.is_empty() {
            self.tasks.post(Task::HandlePendingChips);
        } else {
            self.record(|field| field.check_chip_widths());
        }
    }

    pub fn set_focus_behavior(&mut self, behavior: FocusBehavior) {
        self.config.focus_behavior = behavior;
    }

    /// Focus change. Losing focus unselects the selected chip or commits the
    /// token being typed, then shrinks; gaining focus expands.
    pub fn set_focus(&mut self, focused: bool) {
        if focused == self.focused {
            return;
        }
        self.record(|field| {
            if focused {
                field.focused = true;
                if field
                    .config
                    .focus_behavior
                    .contains(FocusBehavior::EXPAND_WHEN_GOT_FOCUS)
                {
                    field.expand();
                }
            } else {
                field.commit_on_blur();
                field.focused = false;
                if field
                    .config
                    .focus_behavior
                    .contains(FocusBehavior::SHRINK_WHEN_LOST_FOCUS)
                {
                    field.shrink();
                }
            }
        });
    }

    fn commit_on_blur(&mut self) {
        if self.selected_chip.is_some() {
            self.clear_selected_chip();
            return;
        }
        if !self.pending.is_empty() {
            self.tasks.post(Task::HandlePendingChips);
            return;
        }
        if self.no_chips {
            return;
        }
        let text = self.buffer.content();
        let end = self.caret();
        let start = self.tokenizer.find_token_start(&text, end);
        if !self.registry.intersecting(start, end).is_empty() {
            return;
        }
        let token_end = self.tokenizer.find_token_end(&text, start);
        let what_end = crate::tokenizer::move_past_terminators(&text, token_end);
        if what_end != end {
            self.handle_edit(start, what_end);
        } else {
            self.commit_chip(start, end);
        }
    }

    fn should_shrink(&self) -> bool {
        !self.focused
            && self
                .config
                .focus_behavior
                .contains(FocusBehavior::SHRINK_WHEN_LOST_FOCUS)
    }

    /// Tokenize everything queued by `append`. A no-op until the field has a
    /// width; `set_width` schedules it again.
    pub(super) fn handle_pending_chips(&mut self) {
        if self.width == 0 {
            tracing::debug!("field not sized yet, deferring pending chips");
            return;
        }
        if self.pending.is_empty() {
            return;
        }

        let fragments = self.pending.take();
        if fragments.len() > self.config.max_chips_parsed {
            tracing::warn!(
                count = fragments.len(),
                max = self.config.max_chips_parsed,
                "too many pending chips, leaving text unstructured"
            );
            self.no_chips = true;
            self.temporary.clear();
            return;
        }

        let shrink = self.should_shrink();
        let mut from = 0;
        for (i, fragment) in fragments.iter().enumerate() {
            let Some(token_start) = self.buffer.find(fragment, from) else {
                tracing::debug!(fragment = %fragment, "pending fragment no longer in text");
                continue;
            };
            let len = self.buffer.len_chars();
            let mut token_end = token_start + fragment.chars().count().saturating_sub(1);
            if token_end + 2 < len && self.buffer.char_at(token_end) == Some(COMMIT_CHAR_COMMA) {
                token_end += 1;
            }
            let visible = i < self.config.chip_limit || !shrink;
            self.create_replacement_chip(token_start, token_end, visible);
            from = token_end;
        }
        self.sanitize_end();

        // Only chips past the visible limit of an unfocused field stay temporary
        let limit = self.config.chip_limit;
        let count = self.temporary.len();
        if !self.focused && count > limit && count <= self.config.max_chips_parsed {
            self.temporary.drain(..limit);
        } else {
            self.temporary.clear();
        }

        if shrink {
            self.shrink();
        }
    }

    /// Attach a chip over the text a pending fragment left in the buffer. The
    /// text itself is kept as typed.
    fn create_replacement_chip(&mut self, start: usize, end: usize, visible: bool) {
        if start >= end || self.already_has_chip(start, end) {
            return;
        }
        let raw = self.buffer.slice(start..end);
        let trimmed = raw.trim();
        let token = match trimmed.strip_suffix(COMMIT_CHAR_COMMA) {
            Some(stripped) => stripped.to_string(),
            None => raw.clone(),
        };
        let Some(entry) = entry::create_tokenized_entry(&token, self.validator.as_deref()) else {
            return;
        };
        let id = self.next_id();
        let mut chip = Chip::new(id, entry, token);
        if visible {
            chip.visual = Some(self.render(&chip.entry, false));
        }
        tracing::debug!(chip = %id, start, end, visible, "pending chip created");
        self.registry.insert(chip, start..end);
        self.temporary.push(id);
    }

    /// Add one chip per value at the end of the buffer.
    pub(super) fn add_chips(&mut self, values: &[String]) {
        for value in values {
            let entry = Entry::generate_tokenized_entry(value);
            if !self.config.allow_duplicates
                && self.chip_values().iter().any(|title| title == entry.title())
            {
                tracing::debug!(title = entry.title(), "skipping duplicate chip");
                continue;
            }
            self.add_recipient(entry);
        }
    }

    fn add_recipient(&mut self, entry: Entry) {
        let len = self.buffer.len_chars();
        self.put_chip(len..len, entry);
        self.sanitize_between();
    }

    /// Re-render chips wider than the field.
    fn check_chip_widths(&mut self) {
        let too_wide: Vec<_> = self
            .registry
            .iter()
            .filter(|(chip, _)| chip.width() > self.width)
            .map(|(chip, _)| (chip.id, chip.entry.clone()))
            .collect();
        for (id, entry) in too_wide {
            tracing::debug!(chip = %id, width = self.width, "re-rendering chip wider than the field");
            self.replace_chip_internal(id, entry);
        }
    }

    /// Hide chips beyond the chip limit behind a "+N" marker. Their text
    /// stays in the buffer under the marker.
    pub(super) fn shrink(&mut self) {
        if self.no_chips || self.registry.more().is_some() {
            return;
        }
        let ids = self.registry.ids();
        if ids.len() <= self.config.chip_limit {
            return;
        }
        let mut hidden = Vec::new();
        let mut replace_start = None;
        for id in &ids[self.config.chip_limit..] {
            if let Some((chip, range)) = self.registry.remove(*id) {
                replace_start.get_or_insert(range.start);
                let text = self.buffer.slice(range.clone());
                hidden.push((chip, text));
            }
        }
        let Some(start) = replace_start else {
            return;
        };
        let end = self.buffer.len_chars();
        self.more_visual = Some(self.renderer.render_more(hidden.len()));
        self.registry.set_more(start..end);
        tracing::debug!(hidden = hidden.len(), start, end, "shrunk chips behind more marker");
        self.hidden = hidden;
    }

    /// Bring back chips hidden by `shrink`.
    pub(super) fn expand(&mut self) {
        if self.registry.clear_more().is_none() {
            return;
        }
        self.more_visual = None;
        let hidden = std::mem::take(&mut self.hidden);
        let mut end = self.registry.last().map_or(0, |(_, range)| range.end);
        for (mut chip, text) in hidden {
            let Some(start) = self.buffer.find(&text, end) else {
                tracing::warn!(chip = %chip.id, "hidden chip text is gone, dropping chip");
                continue;
            };
            let chip_end = (start + text.chars().count()).min(self.buffer.len_chars());
            if start >= chip_end || self.already_has_chip(start, chip_end) {
                continue;
            }
            if chip.visual.is_none() {
                chip.visual = Some(self.render(&chip.entry, false));
            }
            self.registry.insert(chip, start..chip_end);
            end = chip_end;
        }
        tracing::debug!("expanded hidden chips");
    }
}
