//! Chip selection, clicks, removal and replacement.

use super::ChipsField;
use crate::buffer::TextBufferMut;
use crate::chip::{Chip, ChipId};
use crate::entry::Entry;
use crate::tokenizer::COMMIT_CHAR_SPACE;

impl<B: TextBufferMut> ChipsField<B> {
    /// A click at `offset` while focused. Selects the chip there, deselecting
    /// any other; clicking the selected chip at its end deletes it, elsewhere
    /// unselects it. Returns whether a chip handled the click.
    pub fn click(&mut self, offset: usize) -> bool {
        if !self.focused {
            return false;
        }
        self.record(|field| {
            let offset = field.put_offset_in_range(offset);
            let Some(current) = field.registry.find_chip(offset) else {
                field.clear_selected_chip();
                return false;
            };
            match field.selected_chip {
                Some(selected) if selected != current => {
                    field.clear_selected_chip();
                    field.selected_chip = field.select_chip(current);
                }
                None => {
                    let len = field.buffer.len_chars();
                    field.set_caret(len);
                    field.commit_default();
                    field.selected_chip = field.select_chip(current);
                }
                Some(selected) => field.on_selected_chip_click(selected, offset),
            }
            true
        })
    }

    /// Title of the chip at `offset`, for the host to offer copying it.
    /// Nothing while a chip is selected.
    pub fn long_press(&self, offset: usize) -> Option<String> {
        if self.selected_chip.is_some() {
            return None;
        }
        let offset = self.put_offset_in_range(offset);
        let id = self.registry.find_chip(offset)?;
        self.registry.get(id).map(|chip| chip.title().to_string())
    }

    /// Remove a chip and its text, including trailing spaces.
    pub fn remove_chip(&mut self, id: ChipId) {
        self.record(|field| field.remove_chip_internal(id));
    }

    /// Swap the entry of a chip, re-rendering it over the same text range.
    /// Also resolves temporary chips created by a batch pass.
    pub fn replace_chip(&mut self, id: ChipId, entry: Entry) {
        self.record(|field| field.replace_chip_internal(id, entry));
    }

    /// Unselect the selected chip, if any.
    pub fn clear_selection(&mut self) {
        self.record(|field| field.clear_selected_chip());
    }

    /// Favor the text before a click that landed on whitespace.
    fn put_offset_in_range(&self, offset: usize) -> usize {
        let len = self.buffer.len_chars();
        let mut real_len = len;
        while real_len > 0 && self.buffer.char_at(real_len - 1) == Some(COMMIT_CHAR_SPACE) {
            real_len -= 1;
        }
        if offset >= real_len {
            return offset;
        }
        let mut offset = offset;
        while self.buffer.char_at(offset) == Some(COMMIT_CHAR_SPACE)
            && self.registry.find_chip(offset).is_none()
            && offset > 0
        {
            offset -= 1;
        }
        offset
    }

    /// Rebuild `id` as a selected chip over the same range. Returns the new
    /// chip's id.
    pub(super) fn select_chip(&mut self, id: ChipId) -> Option<ChipId> {
        let Some((chip, range)) = self.registry.remove(id) else {
            tracing::debug!(chip = %id, "chip being selected no longer exists");
            return None;
        };
        let visual = self.render(&chip.entry, true);
        let new_id = self.next_id();
        let selected = Chip::new(new_id, chip.entry, chip.original_text)
            .with_selected(true)
            .with_visual(visual);
        self.registry.insert(selected, range.clone());
        self.replace_temporary(id, new_id);
        self.set_caret(range.end);
        self.cursor_visible = false;
        tracing::debug!(chip = %new_id, "chip selected");
        Some(new_id)
    }

    fn unselect_chip(&mut self, id: ChipId) {
        self.selected_chip = None;
        match self.registry.remove(id) {
            None => {
                tracing::warn!(chip = %id, "selected chip no longer exists, committing at the end");
                let len = self.buffer.len_chars();
                self.set_caret(len);
                self.commit_default();
            }
            Some((chip, range)) => {
                if !self.no_chips {
                    let visual = self.render(&chip.entry, false);
                    let new_id = self.next_id();
                    let unselected =
                        Chip::new(new_id, chip.entry, chip.original_text).with_visual(visual);
                    self.registry.insert(unselected, range);
                    self.replace_temporary(id, new_id);
                }
            }
        }
        self.cursor_visible = true;
        let len = self.buffer.len_chars();
        self.set_caret(len);
    }

    pub(super) fn clear_selected_chip(&mut self) {
        if let Some(id) = self.selected_chip.take() {
            self.unselect_chip(id);
        }
        self.cursor_visible = true;
    }

    fn on_selected_chip_click(&mut self, id: ChipId, offset: usize) {
        let Some(range) = self.registry.chip_range(id) else {
            self.clear_selected_chip();
            return;
        };
        if offset == range.end {
            self.remove_chip_internal(id);
        } else {
            self.clear_selected_chip();
        }
    }

    pub(super) fn remove_chip_internal(&mut self, id: ChipId) {
        let was_selected = self.selected_chip == Some(id);
        if was_selected {
            self.selected_chip = None;
        }
        if let Some((_, range)) = self.registry.remove(id) {
            let mut to_delete = range.end;
            while self.buffer.char_at(to_delete) == Some(COMMIT_CHAR_SPACE) {
                to_delete += 1;
            }
            tracing::debug!(chip = %id, start = range.start, end = to_delete, "removing chip");
            self.splice(range.start..to_delete, "");
        } else {
            tracing::warn!(chip = %id, "cannot remove chip that is no longer attached");
        }
        self.temporary.retain(|t| *t != id);
        if was_selected {
            self.clear_selected_chip();
        }
    }

    pub(super) fn replace_chip_internal(&mut self, id: ChipId, entry: Entry) {
        if self.selected_chip == Some(id) {
            self.selected_chip = None;
        }
        let range = self.registry.remove(id).map(|(_, range)| range);
        self.temporary.retain(|t| *t != id);
        match range {
            None => {
                tracing::error!(chip = %id, "chip to replace does not exist, inserting at the start");
                self.put_chip(0..0, entry);
            }
            Some(range) => {
                let mut to_replace = range.end;
                while self.buffer.char_at(to_replace) == Some(COMMIT_CHAR_SPACE) {
                    to_replace += 1;
                }
                self.put_chip(range.start..to_replace, entry);
            }
        }
        self.cursor_visible = true;
        self.force_notify = true;
    }

    fn replace_temporary(&mut self, old: ChipId, new: ChipId) {
        for id in self.temporary.iter_mut() {
            if *id == old {
                *id = new;
            }
        }
    }
}
