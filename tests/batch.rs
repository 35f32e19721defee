//! Batch tests - set_chips_list, appends, the pending pass, shrink/expand

mod common;

use chipsinput::{ChipsConfig, ChipsField, FocusBehavior};
use common::{
    assert_invariants, field_with_chips, test_field, test_field_with, type_text, ChangeCounter,
    TEST_WIDTH,
};

// ========================================================================
// set_chips_list
// ========================================================================

#[test]
fn test_chips_list_round_trip() {
    let field = field_with_chips(&["Chip1", "Chip2", "Chip3"]);
    assert_eq!(field.chip_values(), vec!["Chip1", "Chip2", "Chip3"]);
    assert_eq!(field.text(), "Chip1, Chip2, Chip3, ");
    assert_invariants(&field);
}

#[test]
fn test_duplicates_kept_by_default() {
    let field = field_with_chips(&["Chip1", "Chip1", "Chip3", "Chip5", "Chip5"]);
    assert_eq!(field.chip_count(), 5);
}

#[test]
fn test_duplicates_skipped_when_disallowed() {
    let config = ChipsConfig {
        allow_duplicates: false,
        ..ChipsConfig::default()
    };
    let mut field = test_field_with(config);
    field.set_chips_list(["Chip1", "Chip1", "Chip3", "Chip5", "Chip5"]);
    field.run_tasks();

    assert_eq!(field.chip_values(), vec!["Chip1", "Chip3", "Chip5"]);
}

#[test]
fn test_duplicates_checked_against_existing_chips() {
    let config = ChipsConfig {
        allow_duplicates: false,
        ..ChipsConfig::default()
    };
    let mut field = test_field_with(config);
    field.set_chips_list(["A"]);
    field.run_tasks();
    field.set_chips_list(["A", "B"]);
    field.run_tasks();

    assert_eq!(field.chip_values(), vec!["A", "B"]);
}

#[test]
fn test_chips_list_notifies_once_per_batch() {
    let mut field = test_field();
    let counter = ChangeCounter::new();
    counter.attach(&mut field);

    field.set_chips_list(["A", "B", "C"]);
    assert_eq!(counter.count(), 0);
    field.run_tasks();
    assert_eq!(counter.count(), 1);
}

// ========================================================================
// Pending pass
// ========================================================================

#[test]
fn test_appended_text_tokenized_by_pending_pass() {
    let mut field = test_field();
    field.append("a@x.com");
    field.append("b@x.com");

    assert_eq!(field.pending_count(), 2);
    assert!(field.chip_values().is_empty());
    assert!(!field.is_watching());

    field.run_tasks();
    assert_eq!(field.pending_count(), 0);
    assert!(field.is_watching());
    assert_eq!(field.chip_values(), vec!["a@x.com", "b@x.com"]);
    assert_eq!(field.text(), "a@x.com, b@x.com, ");
    assert_invariants(&field);
}

#[test]
fn test_pending_pass_waits_for_width() {
    let mut field = ChipsField::new(ChipsConfig::default()).unwrap();
    field.set_focus(true);
    field.append("a@x.com");
    field.run_tasks();

    assert_eq!(field.pending_count(), 1);
    assert!(field.chip_values().is_empty());

    field.set_width(TEST_WIDTH);
    field.run_tasks();
    assert_eq!(field.chip_values(), vec!["a@x.com"]);
}

#[test]
fn test_pending_pass_is_scheduled_once() {
    let mut field = test_field();
    for i in 0..3 {
        field.append(&format!("u{}@x.com", i));
    }
    field.run_tasks();
    assert_eq!(field.chip_count(), 3);
    assert!(!field.has_pending_tasks());
}

#[test]
fn test_overflow_enters_no_chips_mode() {
    let mut field = test_field();
    for i in 0..51 {
        field.append(&format!("user{}@x.com", i));
    }
    field.run_tasks();

    assert!(field.is_no_chips());
    assert_eq!(field.chip_count(), 0);

    // Later input is left as plain text
    type_text(&mut field, "z@x.com,");
    assert_eq!(field.chip_count(), 0);
    assert!(field.text().ends_with("z@x.com,"));

    field.reset();
    assert!(!field.is_no_chips());
    type_text(&mut field, "z@x.com,");
    assert_eq!(field.chip_count(), 1);
}

#[test]
fn test_limit_sized_batch_is_tokenized() {
    let mut field = test_field();
    for i in 0..50 {
        field.append(&format!("user{}@x.com", i));
    }
    field.run_tasks();

    assert!(!field.is_no_chips());
    assert_eq!(field.chip_count(), 50);
    assert_invariants(&field);
}

// ========================================================================
// Shrink / expand
// ========================================================================

#[test]
fn test_blur_shrinks_and_focus_expands() {
    let mut field = field_with_chips(&["A1", "A2", "A3", "A4"]);
    field.set_focus(false);

    assert_eq!(field.chips().len(), 2);
    assert_eq!(field.hidden_chips().count(), 2);
    assert_eq!(field.chip_values(), vec!["A1", "A2", "A3", "A4"]);
    let (range, visual) = field.more_chip().expect("more marker");
    assert_eq!(range, 8..16);
    assert_eq!(visual.label, "+2");

    field.set_focus(true);
    assert_eq!(field.chips().len(), 4);
    assert!(field.more_chip().is_none());
    assert_eq!(field.text(), "A1, A2, A3, A4, ");
    assert_invariants(&field);
}

#[test]
fn test_caret_inside_more_marker_moves_past_it() {
    let mut field = field_with_chips(&["A1", "A2", "A3", "A4"]);
    field.set_focus(false);
    let (range, _) = field.more_chip().expect("more marker");
    assert_eq!(range, 8..16);

    field.on_selection_changed(10, 10);
    assert_eq!(field.caret(), 16);

    field.type_char('z');
    field.set_focus(true);
    assert_eq!(field.chip_values(), vec!["A1", "A2", "A3", "A4"]);
    assert_eq!(field.chips().len(), 4);
    assert_eq!(field.text(), "A1, A2, A3, A4, z");
}

#[test]
fn test_no_shrink_without_focus_behavior() {
    let mut field = field_with_chips(&["A1", "A2", "A3", "A4"]);
    field.set_focus_behavior(FocusBehavior::empty());
    field.set_focus(false);

    assert_eq!(field.chips().len(), 4);
    assert!(field.more_chip().is_none());
}

#[test]
fn test_unfocused_pass_hides_chips_beyond_limit() {
    let mut field = ChipsField::new(ChipsConfig::default()).unwrap();
    field.set_width(TEST_WIDTH);
    for value in ["a@x.com", "b@x.com", "c@x.com", "d@x.com"] {
        field.append(value);
    }
    field.run_tasks();

    assert_eq!(field.chips().len(), 2);
    assert_eq!(field.chip_count(), 4);
    assert_eq!(field.temporary_chips().len(), 2);
    assert!(field.hidden_chips().all(|chip| !chip.is_visible()));

    field.set_focus(true);
    assert_eq!(field.chips().len(), 4);
    assert!(field.chips().iter().all(|(chip, _)| chip.is_visible()));
}

// ========================================================================
// Width
// ========================================================================

#[test]
fn test_narrow_width_rerenders_wide_chips() {
    let long = "a".repeat(40);
    let mut field = field_with_chips(&[long.as_str()]);
    assert!(field.chips()[0].0.width() > 120);

    field.set_width(120);
    let chips = field.chips();
    assert!(chips[0].0.width() <= 120);
    assert_eq!(chips[0].0.title(), long);
    assert_eq!(field.text(), format!("{}, ", long));
}
