//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use chipsinput::{ChipsConfig, ChipsField, StringBuffer};

/// Width used for every test field
pub const TEST_WIDTH: u32 = 400;

/// Create a sized, focused field with default configuration
pub fn test_field() -> ChipsField {
    test_field_with(ChipsConfig::default())
}

/// Create a sized, focused field with `config`
pub fn test_field_with(config: ChipsConfig) -> ChipsField {
    let mut field = ChipsField::new(config).expect("default style builds");
    field.set_width(TEST_WIDTH);
    field.set_focus(true);
    field
}

/// Create a field holding one chip per value
pub fn field_with_chips(values: &[&str]) -> ChipsField {
    let mut field = test_field();
    field.set_chips_list(values.iter().copied());
    field.run_tasks();
    field
}

/// Type `text` one character at a time
pub fn type_text(field: &mut ChipsField, text: &str) {
    for ch in text.chars() {
        field.type_char(ch);
    }
}

/// Counts `on_data_changed` calls
#[derive(Clone, Default)]
pub struct ChangeCounter {
    calls: Rc<Cell<usize>>,
}

impl ChangeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.get()
    }

    /// Attach to `field`; the returned counter shares the same count
    pub fn attach(&self, field: &mut ChipsField<StringBuffer>) {
        let calls = self.calls.clone();
        field.set_listener(move || calls.set(calls.get() + 1));
    }
}

/// Chips are sorted, non-overlapping, inside the buffer, and every chip's
/// text ends in the canonical separator.
pub fn assert_invariants(field: &ChipsField) {
    let text: Vec<char> = field.text().chars().collect();
    let chips = field.chips();
    for pair in chips.windows(2) {
        assert!(
            pair[0].1.end <= pair[1].1.start,
            "chips overlap: {:?} and {:?}",
            pair[0].1,
            pair[1].1
        );
    }
    for (chip, range) in &chips {
        assert!(range.start < range.end, "empty span for {}", chip.id);
        assert!(range.end <= text.len(), "span {:?} past end of buffer", range);
    }
    if let Some((_, last)) = chips.last() {
        let tail: String = text[last.end..].iter().collect();
        assert!(tail.is_empty() || tail == " ", "text after last chip: {:?}", tail);
    }
}
