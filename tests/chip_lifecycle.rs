//! Chip lifecycle tests - commit, select, delete, replace, undo

mod common;

use chipsinput::{
    ChipsConfig, ChipsField, DomainValidator, Entry, StaticSuggestions, StringBuffer,
};
use common::{assert_invariants, field_with_chips, test_field, test_field_with, type_text, ChangeCounter};

fn focused(mut field: ChipsField<StringBuffer>) -> ChipsField<StringBuffer> {
    field.set_width(common::TEST_WIDTH);
    field.set_focus(true);
    field
}

// ========================================================================
// Commit by character
// ========================================================================

#[test]
fn test_comma_commits_typed_token() {
    let mut field = test_field();
    type_text(&mut field, "a@x.com,");

    assert_eq!(field.chip_values(), vec!["a@x.com"]);
    assert_eq!(field.text(), "a@x.com, ");
    assert_eq!(field.caret(), 9);
    assert_invariants(&field);
}

#[test]
fn test_semicolon_commits_second_chip() {
    let mut field = test_field();
    type_text(&mut field, "a@x.com,b@x.com;");

    assert_eq!(field.chip_values(), vec!["a@x.com", "b@x.com"]);
    assert_eq!(field.text(), "a@x.com, b@x.com, ");
    assert_invariants(&field);
}

#[test]
fn test_token_below_threshold_stays_text() {
    let config = ChipsConfig {
        threshold: 3,
        ..ChipsConfig::default()
    };
    let mut field = test_field_with(config);
    type_text(&mut field, "a,");

    assert!(field.chip_values().is_empty());
    assert_eq!(field.text(), "a,");
}

#[test]
fn test_space_commits_only_valid_tokens() {
    let mut plain = test_field();
    type_text(&mut plain, "a@x.com ");
    assert!(plain.chip_values().is_empty());

    let mut validated = focused(
        ChipsField::builder(StringBuffer::new())
            .validator(DomainValidator::new())
            .build()
            .unwrap(),
    );
    type_text(&mut validated, "a@x.com ");
    assert_eq!(validated.chip_values(), vec!["a@x.com"]);
    assert_eq!(validated.text(), "a@x.com, ");
}

#[test]
fn test_invalid_token_becomes_editable_chip() {
    let mut field = focused(
        ChipsField::builder(StringBuffer::new())
            .validator(DomainValidator::new())
            .build()
            .unwrap(),
    );
    type_text(&mut field, "bob,");

    let chips = field.chips();
    assert_eq!(chips.len(), 1);
    assert_eq!(chips[0].0.title(), "bob");
    assert!(!chips[0].0.entry.is_valid());
}

#[test]
fn test_validator_completes_bare_name() {
    let mut field = focused(
        ChipsField::builder(StringBuffer::new())
            .validator(DomainValidator::with_domain("x.com"))
            .build()
            .unwrap(),
    );
    type_text(&mut field, "bob,");

    assert_eq!(field.chip_values(), vec!["bob@x.com"]);
    assert_eq!(field.text(), "bob@x.com, ");
}

// ========================================================================
// Key actions and focus
// ========================================================================

#[test]
fn test_done_action_commits_token() {
    let mut field = test_field();
    type_text(&mut field, "abc");

    assert!(field.on_done_action());
    assert_eq!(field.chip_values(), vec!["abc"]);
    assert_eq!(field.text(), "abc, ");

    // Nothing left to commit and nothing selected
    assert!(!field.on_done_action());
}

#[test]
fn test_focus_loss_commits_token() {
    let mut field = test_field();
    type_text(&mut field, "abc");
    field.set_focus(false);

    assert_eq!(field.chip_values(), vec!["abc"]);
    assert!(!field.has_focus());
}

#[test]
fn test_caret_inside_chips_moves_after_last_chip() {
    let mut field = field_with_chips(&["A", "B"]);
    field.on_selection_changed(1, 1);
    assert_eq!(field.caret(), 6);
}

// ========================================================================
// Suggestions
// ========================================================================

#[test]
fn test_first_suggestion_wins_on_commit() {
    let mut field = focused(
        ChipsField::builder(StringBuffer::new())
            .suggestions(StaticSuggestions::new(["alice@example.com", "bob@example.com"]))
            .build()
            .unwrap(),
    );
    type_text(&mut field, "ali");
    assert!(field.on_done_action());

    let chips = field.chips();
    assert_eq!(chips.len(), 1);
    assert_eq!(chips[0].0.title(), "alice@example.com");
    assert_eq!(chips[0].0.entry.id(), Some(0));
    assert_eq!(field.text(), "alice@example.com, ");
}

#[test]
fn test_pass_through_keeps_typed_text() {
    let mut suggestions = StaticSuggestions::new(["alice@example.com"]);
    suggestions.set_pass_through(true);
    let mut field = focused(
        ChipsField::builder(StringBuffer::new())
            .suggestions(suggestions)
            .build()
            .unwrap(),
    );
    type_text(&mut field, "ali");
    assert!(field.on_done_action());

    assert_eq!(field.chip_values(), vec!["ali"]);
}

#[test]
fn test_item_chosen_replaces_token() {
    let mut field = test_field();
    type_text(&mut field, "bo");
    field.on_item_chosen(Some(&Entry::new(7, "bob@example.com")));

    let chips = field.chips();
    assert_eq!(chips[0].0.title(), "bob@example.com");
    assert_eq!(chips[0].0.entry.id(), Some(7));

    // A missing item is ignored
    field.on_item_chosen(None);
    assert_eq!(field.chip_count(), 1);
}

// ========================================================================
// Selection
// ========================================================================

#[test]
fn test_click_selects_chip() {
    let mut field = field_with_chips(&["Chip1", "Chip2"]);
    assert!(field.click(2));

    let selected = field.selected_chip().expect("chip selected");
    let chip = field.chip(selected).unwrap();
    assert!(chip.selected);
    assert_eq!(chip.title(), "Chip1");
    assert!(!field.is_cursor_visible());
    assert_eq!(field.caret(), 6);
}

#[test]
fn test_click_other_chip_moves_selection() {
    let mut field = field_with_chips(&["Chip1", "Chip2"]);
    field.click(2);
    field.click(9);

    let selected: Vec<_> = field
        .chips()
        .into_iter()
        .filter(|(chip, _)| chip.selected)
        .map(|(chip, _)| chip.title().to_string())
        .collect();
    assert_eq!(selected, vec!["Chip2"]);
}

#[test]
fn test_click_selected_chip_end_deletes_it() {
    let mut field = field_with_chips(&["Chip1", "Chip2"]);
    field.click(2);
    field.click(6);

    assert_eq!(field.chip_values(), vec!["Chip2"]);
    assert_eq!(field.text(), "Chip2, ");
    assert!(field.selected_chip().is_none());
    assert_invariants(&field);
}

#[test]
fn test_click_without_focus_is_ignored() {
    let mut field = field_with_chips(&["Chip1"]);
    field.set_focus(false);
    assert!(!field.click(2));
    assert!(field.selected_chip().is_none());
}

#[test]
fn test_back_clears_selection() {
    let mut field = field_with_chips(&["Chip1"]);
    field.click(2);

    assert!(field.on_back());
    assert!(field.selected_chip().is_none());
    assert!(field.is_cursor_visible());
    assert!(!field.on_back());
}

#[test]
fn test_long_press_returns_title() {
    let field = field_with_chips(&["Chip1", "Chip2"]);
    assert_eq!(field.long_press(9).as_deref(), Some("Chip2"));
}

// ========================================================================
// Deletion and replacement
// ========================================================================

#[test]
fn test_backspace_after_chip_removes_it() {
    let mut field = field_with_chips(&["A", "B"]);
    field.delete_backward();

    assert_eq!(field.chip_values(), vec!["A"]);
    assert_eq!(field.text(), "A, ");
    assert_invariants(&field);
}

#[test]
fn test_remove_last_chip_leaves_no_dangling_text() {
    let mut field = field_with_chips(&["A", "B"]);
    let last = field.chips()[1].0.id;
    field.remove_chip(last);

    assert_eq!(field.chip_values(), vec!["A"]);
    assert_eq!(field.text(), "A, ");
    assert_eq!(field.chip_range(last), None);
    assert_invariants(&field);
}

#[test]
fn test_replace_chip_keeps_position_and_notifies() {
    let mut field = field_with_chips(&["Chip1", "Chip2"]);
    let counter = ChangeCounter::new();
    counter.attach(&mut field);

    let first = field.chips()[0].0.id;
    field.replace_chip(first, Entry::generate_entry("New"));

    assert_eq!(field.chip_values(), vec!["New", "Chip2"]);
    assert_eq!(field.text(), "New, Chip2, ");
    assert_eq!(counter.count(), 1);
    assert_invariants(&field);
}

#[test]
fn test_replace_stale_chip_inserts_at_start() {
    let mut field = field_with_chips(&["Chip1"]);
    let id = field.chips()[0].0.id;
    field.remove_chip(id);
    field.replace_chip(id, Entry::generate_entry("Back"));

    assert_eq!(field.chip_values(), vec!["Back"]);
}

#[test]
fn test_clearing_the_buffer_drops_all_chips() {
    let mut field = field_with_chips(&["A", "B"]);
    let len = field.text().chars().count();
    field.replace(0..len, "");

    assert_eq!(field.chip_count(), 0);
    assert!(field.chips().is_empty());
}

#[test]
fn test_remove_all_chips_notifies() {
    let mut field = field_with_chips(&["A", "B"]);
    let counter = ChangeCounter::new();
    counter.attach(&mut field);

    field.remove_all_chips(true);
    assert_eq!(field.text(), "");
    assert_eq!(counter.count(), 1);
}

// ========================================================================
// Undo / redo
// ========================================================================

#[test]
fn test_undo_remove_restores_chip() {
    let mut field = field_with_chips(&["A", "B"]);
    let last = field.chips()[1].0.id;
    field.remove_chip(last);

    assert!(field.undo());
    assert_eq!(field.text(), "A, B, ");
    assert_eq!(field.chip_values(), vec!["A", "B"]);

    assert!(field.redo());
    assert_eq!(field.text(), "A, ");
    assert_eq!(field.chip_values(), vec!["A"]);
}

#[test]
fn test_undo_typed_commit_is_one_step_per_key() {
    let mut field = test_field();
    type_text(&mut field, "ab,");
    assert_eq!(field.chip_values(), vec!["ab"]);

    // Undo the comma: the chip goes, the typed text stays
    assert!(field.undo());
    assert_eq!(field.text(), "ab");
    assert!(field.chip_values().is_empty());
}
