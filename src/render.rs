//! Chip rendering capability.
//!
//! The field never draws anything itself. It asks a `ChipRenderer` for an
//! opaque `VisualHandle` and keeps it as the payload of the chip span. Hosts
//! with a real canvas implement the trait; `TextChipRenderer` is a plain-text
//! renderer used by the demo binary and the tests.

use serde::{Deserialize, Serialize};

use crate::entry::{self, Entry};
use crate::error::{ChipsError, Result};

/// Opaque rendered chip. The field only reads `width` (for the resize check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualHandle {
    pub id: u64,
    /// Measured width in host units
    pub width: u32,
    pub label: String,
}

pub trait ChipRenderer {
    /// Render `entry` as a chip no wider than `available_width` where possible.
    fn render_chip(&mut self, entry: &Entry, selected: bool, available_width: u32) -> VisualHandle;

    /// Render the "+N" marker that stands in for chips hidden by a shrink.
    fn render_more(&mut self, hidden: usize) -> VisualHandle;
}

/// Visual resources for chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipStyle {
    /// Background resource for normal chips; required
    pub background: Option<String>,
    /// Background for chips that failed validation (falls back to `background`)
    pub invalid_background: Option<String>,
    /// Glyph appended to selected chips
    pub delete_glyph: String,
    /// Width of one character cell in host units
    pub char_width: u32,
    /// Horizontal padding on each side of the label
    pub padding: u32,
    pub height: u32,
}

impl Default for ChipStyle {
    fn default() -> Self {
        Self {
            background: Some("chip".to_string()),
            invalid_background: Some("chip-invalid".to_string()),
            delete_glyph: "×".to_string(),
            char_width: 8,
            padding: 4,
            height: 32,
        }
    }
}

/// Renders chips as bracketed text labels, e.g. `[alice@x.com]` or
/// `[alice@x.com ×]` when selected. Labels are ellipsized to fit.
#[derive(Debug, Clone)]
pub struct TextChipRenderer {
    style: ChipStyle,
    next_id: u64,
}

impl TextChipRenderer {
    pub fn from_style(style: &ChipStyle) -> Result<Self> {
        if style.background.as_deref().map_or(true, str::is_empty) {
            return Err(ChipsError::MissingChipBackground);
        }
        if style.height == 0 {
            return Err(ChipsError::InvalidChipHeight(style.height));
        }
        Ok(Self {
            style: style.clone(),
            next_id: 0,
        })
    }

    pub fn style(&self) -> &ChipStyle {
        &self.style
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn measure(&self, label: &str) -> u32 {
        label.chars().count() as u32 * self.style.char_width.max(1) + 2 * self.style.padding
    }

    /// Longest prefix of `text` (plus an ellipsis) whose label fits `max_width`.
    fn ellipsize(&self, text: &str, suffix: &str, max_width: u32) -> String {
        let full = format!("[{}{}]", text, suffix);
        if max_width == 0 || self.measure(&full) <= max_width {
            return full;
        }
        let chars: Vec<char> = text.chars().collect();
        for keep in (0..chars.len()).rev() {
            let prefix: String = chars[..keep].iter().collect();
            let candidate = format!("[{}…{}]", prefix, suffix);
            if self.measure(&candidate) <= max_width {
                return candidate;
            }
        }
        format!("[…{}]", suffix)
    }
}

impl ChipRenderer for TextChipRenderer {
    fn render_chip(&mut self, entry: &Entry, selected: bool, available_width: u32) -> VisualHandle {
        let suffix = if selected {
            format!(" {}", self.style.delete_glyph)
        } else {
            String::new()
        };
        let mut label = self.ellipsize(entry::display_text(entry), &suffix, available_width);
        if !entry.is_valid() && self.style.invalid_background.is_some() {
            label.insert(0, '!');
        }
        VisualHandle {
            id: self.next_id(),
            width: self.measure(&label),
            label,
        }
    }

    fn render_more(&mut self, hidden: usize) -> VisualHandle {
        let label = format!("+{}", hidden);
        VisualHandle {
            id: self.next_id(),
            width: self.measure(&label),
            label,
        }
    }
}
