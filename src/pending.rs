//! Fragments appended programmatically, waiting for the next batch pass.

use std::mem;

use crate::tokenizer::{COMMIT_CHAR_COMMA, SEPARATOR};

/// Upper bound on fragments tokenized by one batch pass. A larger backlog
/// switches the field to no-chips mode.
pub const MAX_CHIPS_PARSED: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    fragments: Vec<String>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Take everything queued so far. Fragments pushed afterwards wait for the
    /// next pass.
    pub fn take(&mut self) -> Vec<String> {
        mem::take(&mut self.fragments)
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}

/// Text to append for a fragment: the fragment plus a separator unless its
/// trimmed form already ends with a comma. `None` for blank fragments.
pub fn terminated_fragment(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.ends_with(COMMIT_CHAR_COMMA) {
        Some(text.to_string())
    } else {
        Some(format!("{}{}", text, SEPARATOR))
    }
}
