//! Chip values stored in the span registry.

use std::fmt;

use crate::entry::Entry;
use crate::render::VisualHandle;

/// Identity of a chip span. A new id is issued every time a chip is rebuilt
/// (select, unselect, replace), so a stale id never matches a live span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChipId(pub u64);

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chip#{}", self.0)
    }
}

/// A committed token attached to a range of the text buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    pub id: ChipId,
    pub entry: Entry,
    pub selected: bool,
    /// Buffer text the chip was created from
    pub original_text: String,
    /// Rendered representation; `None` for chips hidden by a batch pass
    pub visual: Option<VisualHandle>,
}

impl Chip {
    pub fn new(id: ChipId, entry: Entry, original_text: impl Into<String>) -> Self {
        Self {
            id,
            entry,
            selected: false,
            original_text: original_text.into(),
            visual: None,
        }
    }

    pub fn with_visual(mut self, visual: VisualHandle) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn title(&self) -> &str {
        self.entry.title()
    }

    pub fn is_visible(&self) -> bool {
        self.visual.is_some()
    }

    /// Rendered width, 0 for invisible chips
    pub fn width(&self) -> u32 {
        self.visual.as_ref().map_or(0, |v| v.width)
    }
}
