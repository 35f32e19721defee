//! Caret and selection over the chip field buffer.

/// A text selection with anchor (start point) and head (caret position).
/// The anchor stays fixed while the head moves during selection extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub anchor: usize,
    /// Where the caret is (moving point)
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (caret with no selection)
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Check if selection is empty (anchor == head)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the start offset (minimum of anchor and head)
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end offset (maximum of anchor and head)
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Clamp both ends to a buffer of `len` characters
    pub fn clamp(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.head = self.head.min(len);
    }

    /// Map both ends through an edit that replaced `deleted` characters at
    /// `start` with `inserted` characters. A caret sitting exactly at an
    /// insertion point ends up after the inserted text.
    pub fn apply_edit(&mut self, start: usize, deleted: usize, inserted: usize) {
        let map = |offset: usize| {
            if offset < start {
                offset
            } else if offset >= start + deleted {
                offset - deleted + inserted
            } else {
                start + inserted
            }
        };
        self.anchor = map(self.anchor);
        self.head = map(self.head);
    }
}
