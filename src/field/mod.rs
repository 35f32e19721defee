//! The chip field: a text buffer plus the chips laid over it.
//!
//! `ChipsField` owns the span registry and drives the chip lifecycle. The host
//! owns the text buffer type, reports its edits through
//! [`ChipsField::before_change`] / [`ChipsField::after_change`] (or uses the
//! convenience editing methods), and drains deferred work with
//! [`ChipsField::run_tasks`] on its own thread.
//!
//! The implementation is split by concern:
//! - `watcher`: reacting to text edits (commit characters, chip deletion)
//! - `commit`: turning tokens into chips, key actions, sanitizing
//! - `select`: chip selection, clicks, removal and replacement
//! - `batch`: programmatic appends, the pending pass, sizing and focus
//! - `paste`: clipboard paste

mod batch;
mod commit;
mod paste;
mod select;
mod watcher;

use std::ops::Range;

use crate::buffer::{StringBuffer, TextBufferMut};
use crate::chip::{Chip, ChipId};
use crate::config::ChipsConfig;
use crate::entry::{self, Entry};
use crate::error::Result;
use crate::history::{EditHistory, EditOperation, FieldSnapshot};
use crate::pending::PendingQueue;
use crate::registry::SpanRegistry;
use crate::render::{ChipRenderer, TextChipRenderer, VisualHandle};
use crate::selection::Selection;
use crate::suggestions::SuggestionSource;
use crate::tasks::{Task, TaskQueue};
use crate::tokenizer::{AddressTokenizer, Tokenizer};
use crate::validator::Validator;

/// Receives chip-set change notifications.
pub trait ChipListener {
    fn on_data_changed(&mut self);
}

impl<F: FnMut()> ChipListener for F {
    fn on_data_changed(&mut self) {
        self()
    }
}

/// Text and chip state captured when a recorded mutation starts.
struct ChangeMark {
    text: String,
    snapshot: FieldSnapshot,
}

pub struct ChipsField<B: TextBufferMut = StringBuffer> {
    buffer: B,
    registry: SpanRegistry,
    selection: Selection,
    selected_chip: Option<ChipId>,
    config: ChipsConfig,

    tokenizer: Box<dyn Tokenizer>,
    validator: Option<Box<dyn Validator>>,
    renderer: Box<dyn ChipRenderer>,
    suggestions: Option<Box<dyn SuggestionSource>>,
    listener: Option<Box<dyn ChipListener>>,

    pending: PendingQueue,
    tasks: TaskQueue,
    history: EditHistory,
    mark: Option<ChangeMark>,

    focused: bool,
    width: u32,
    no_chips: bool,
    watching: bool,
    cursor_visible: bool,
    /// Chips created by a batch pass and not yet resolved by `replace_chip`
    temporary: Vec<ChipId>,
    /// Chips hidden behind the more marker, with their buffer text
    hidden: Vec<(Chip, String)>,
    more_visual: Option<VisualHandle>,

    previous_chip_count: usize,
    quiet: bool,
    force_notify: bool,
    next_chip_id: u64,
}

/// Builder for [`ChipsField`].
pub struct ChipsFieldBuilder<B: TextBufferMut> {
    buffer: B,
    config: ChipsConfig,
    renderer: Option<Box<dyn ChipRenderer>>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    validator: Option<Box<dyn Validator>>,
    suggestions: Option<Box<dyn SuggestionSource>>,
    listener: Option<Box<dyn ChipListener>>,
}

impl<B: TextBufferMut> ChipsFieldBuilder<B> {
    pub fn config(mut self, config: ChipsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn renderer(mut self, renderer: impl ChipRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn suggestions(mut self, suggestions: impl SuggestionSource + 'static) -> Self {
        self.suggestions = Some(Box::new(suggestions));
        self
    }

    pub fn listener(mut self, listener: impl ChipListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Build the field. Without an explicit renderer, a `TextChipRenderer` is
    /// built from the configured style, which fails if the style lacks a chip
    /// background.
    pub fn build(self) -> Result<ChipsField<B>> {
        let renderer = match self.renderer {
            Some(renderer) => renderer,
            None => Box::new(TextChipRenderer::from_style(&self.config.style)?),
        };
        let history = EditHistory::with_max_size(self.config.history_size);
        let len = self.buffer.len_chars();
        Ok(ChipsField {
            buffer: self.buffer,
            registry: SpanRegistry::new(),
            selection: Selection::collapsed(len),
            selected_chip: None,
            config: self.config,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(AddressTokenizer::new())),
            validator: self.validator,
            renderer,
            suggestions: self.suggestions,
            listener: self.listener,
            pending: PendingQueue::new(),
            tasks: TaskQueue::new(),
            history,
            mark: None,
            focused: false,
            width: 0,
            no_chips: false,
            watching: true,
            cursor_visible: true,
            temporary: Vec::new(),
            hidden: Vec::new(),
            more_visual: None,
            previous_chip_count: 0,
            quiet: false,
            force_notify: false,
            next_chip_id: 0,
        })
    }
}

impl ChipsField<StringBuffer> {
    /// Field over an empty `StringBuffer`
    pub fn new(config: ChipsConfig) -> Result<Self> {
        Self::builder(StringBuffer::new()).config(config).build()
    }
}

impl<B: TextBufferMut> ChipsField<B> {
    pub fn builder(buffer: B) -> ChipsFieldBuilder<B> {
        ChipsFieldBuilder {
            buffer,
            config: ChipsConfig::default(),
            renderer: None,
            tokenizer: None,
            validator: None,
            suggestions: None,
            listener: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Mutable buffer access for host edits. Every change made through it must
    /// be bracketed by `before_change` / `after_change`.
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> B {
        self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.content()
    }

    pub fn config(&self) -> &ChipsConfig {
        &self.config
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn caret(&self) -> usize {
        self.selection.end()
    }

    /// Visible chips with their ranges, sorted by start
    pub fn chips(&self) -> Vec<(&Chip, Range<usize>)> {
        self.registry.iter().collect()
    }

    pub fn chip(&self, id: ChipId) -> Option<&Chip> {
        self.registry.get(id)
    }

    /// Range of a chip; `None` if the chip is no longer attached
    pub fn chip_range(&self, id: ChipId) -> Option<Range<usize>> {
        self.registry.chip_range(id)
    }

    pub fn chip_count(&self) -> usize {
        self.registry.len() + self.hidden.len()
    }

    pub fn selected_chip(&self) -> Option<ChipId> {
        self.selected_chip
    }

    /// The "+N" marker and its range while the field is shrunk
    pub fn more_chip(&self) -> Option<(Range<usize>, &VisualHandle)> {
        Some((self.registry.more()?, self.more_visual.as_ref()?))
    }

    pub fn hidden_chips(&self) -> impl Iterator<Item = &Chip> + '_ {
        self.hidden.iter().map(|(chip, _)| chip)
    }

    pub fn temporary_chips(&self) -> &[ChipId] {
        &self.temporary
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_no_chips(&self) -> bool {
        self.no_chips
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn set_listener(&mut self, listener: impl ChipListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn set_suggestions(&mut self, suggestions: impl SuggestionSource + 'static) {
        self.suggestions = Some(Box::new(suggestions));
    }

    pub fn set_validator(&mut self, validator: impl Validator + 'static) {
        self.validator = Some(Box::new(validator));
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Titles of all chips in buffer order, including chips hidden behind the
    /// more marker.
    pub fn chip_values(&self) -> Vec<String> {
        self.registry
            .iter()
            .map(|(chip, _)| chip.title().to_string())
            .chain(self.hidden.iter().map(|(chip, _)| chip.title().to_string()))
            .collect()
    }

    /// Queue one chip per value. Runs with the next `run_tasks`.
    pub fn set_chips_list<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.tasks.post(Task::AddChips(values));
    }

    /// Remove every chip and its text. With `notify == false` the listener is
    /// not told about the change.
    pub fn remove_all_chips(&mut self, notify: bool) {
        self.record(|field| {
            field.quiet = !notify;
            field.expand();
            for id in field.registry.ids() {
                field.remove_chip_internal(id);
            }
            field.sanitize_end();
        });
    }

    /// Back to an empty field: leaves no-chips mode and drops all queued work
    /// and history.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.registry.clear();
        self.selection = Selection::collapsed(0);
        self.selected_chip = None;
        self.pending.clear();
        self.tasks.clear();
        self.history.clear();
        self.mark = None;
        self.no_chips = false;
        self.watching = true;
        self.cursor_visible = true;
        self.temporary.clear();
        self.hidden.clear();
        self.more_visual = None;
        self.previous_chip_count = 0;
        tracing::debug!("field reset");
    }

    /// Run deferred work until the queue is empty.
    pub fn run_tasks(&mut self) {
        while let Some(task) = self.tasks.pop() {
            tracing::trace!(?task, "running task");
            match task {
                Task::HandlePendingChips => self.record(|field| field.handle_pending_chips()),
                Task::AddChips(values) => self.record(|field| field.add_chips(&values)),
                Task::ResumeWatching => self.watching = true,
            }
        }
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    pub fn undo(&mut self) -> bool {
        let Some(op) = self.history.pop_undo() else {
            return false;
        };
        self.revert(op);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(op) = self.history.pop_redo() else {
            return false;
        };
        self.revert(op);
        true
    }

    /// Put text and chip state back to how they were before `op`.
    fn revert(&mut self, op: EditOperation) {
        let start = op.offset;
        let end = start + op.inserted_text.chars().count();
        self.buffer.replace(start..end, &op.deleted_text);
        self.restore(op.before);
        self.notify_if_changed();
    }

    fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            registry: self.registry.clone(),
            selection: self.selection,
            selected_chip: self.selected_chip,
            hidden: self.hidden.clone(),
            more_visual: self.more_visual.clone(),
        }
    }

    fn restore(&mut self, snapshot: FieldSnapshot) {
        self.registry = snapshot.registry;
        self.selection = snapshot.selection;
        self.selection.clamp(self.buffer.len_chars());
        self.selected_chip = snapshot.selected_chip;
        self.cursor_visible = self.selected_chip.is_none();
        self.hidden = snapshot.hidden;
        self.more_visual = snapshot.more_visual;
        self.temporary.retain(|id| self.registry.contains(*id));
    }

    // =========================================================================
    // Recording and notification
    // =========================================================================

    /// Start a recorded mutation. Returns false when one is already open.
    fn begin_record(&mut self) -> bool {
        if self.mark.is_some() {
            return false;
        }
        self.mark = Some(ChangeMark {
            text: self.buffer.content(),
            snapshot: self.snapshot(),
        });
        true
    }

    fn end_record(&mut self) {
        if let Some(mark) = self.mark.take() {
            let op = EditOperation::from_change(
                &mark.text,
                &self.buffer.content(),
                mark.snapshot,
                self.snapshot(),
            );
            if !op.is_noop() {
                self.history.push(op);
            }
        }
        debug_assert!(self.registry.is_consistent());
        self.notify_if_changed();
    }

    /// Run `f` as one undoable unit. Nested calls join the outer unit.
    fn record<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let owner = self.begin_record();
        let result = f(self);
        if owner {
            self.end_record();
        }
        result
    }

    fn notify_if_changed(&mut self) {
        let count = self.chip_count();
        let changed = count != self.previous_chip_count || self.force_notify;
        self.previous_chip_count = count;
        self.force_notify = false;
        if std::mem::take(&mut self.quiet) {
            return;
        }
        if changed {
            tracing::debug!(count, "chip set changed");
            if let Some(listener) = self.listener.as_mut() {
                listener.on_data_changed();
            }
        }
    }

    // =========================================================================
    // Internal editing primitives
    // =========================================================================

    fn next_id(&mut self) -> ChipId {
        self.next_chip_id += 1;
        ChipId(self.next_chip_id)
    }

    /// Move spans, caret and chip bookkeeping through an edit already applied
    /// to the buffer.
    fn shift(&mut self, start: usize, deleted: usize, inserted: usize) {
        let detached = self.registry.apply_edit(start, deleted, inserted);
        for chip in detached {
            if self.selected_chip == Some(chip.id) {
                self.selected_chip = None;
                self.cursor_visible = true;
            }
            self.temporary.retain(|id| *id != chip.id);
        }
        self.selection.apply_edit(start, deleted, inserted);
        self.selection.clamp(self.buffer.len_chars());
    }

    /// Replace `range` of the buffer with `text` without running the watcher.
    fn splice(&mut self, range: Range<usize>, text: &str) {
        let len = self.buffer.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        let inserted = text.chars().count();
        self.buffer.replace(start..end, text);
        self.shift(start, end - start, inserted);
    }

    fn set_caret(&mut self, offset: usize) {
        self.selection = Selection::collapsed(offset.min(self.buffer.len_chars()));
    }

    fn render(&mut self, entry: &Entry, selected: bool) -> VisualHandle {
        self.renderer.render_chip(entry, selected, self.width)
    }

    /// Canonical chip text for `entry` plus the chip to attach over it (all
    /// but the trailing space). In no-chips mode only the text is produced.
    fn create_chip(&mut self, entry: Entry, selected: bool) -> Option<(String, Option<Chip>)> {
        let text = entry::address_text(&entry, self.tokenizer.as_ref());
        if text.is_empty() {
            return None;
        }
        if self.no_chips {
            return Some((text, None));
        }
        let visual = self.render(&entry, selected);
        let id = self.next_id();
        let chip = Chip::new(id, entry, text.clone())
            .with_selected(selected)
            .with_visual(visual);
        Some((text, Some(chip)))
    }

    /// Replace `range` with the chip text for `entry` and attach the chip.
    fn put_chip(&mut self, range: Range<usize>, entry: Entry) -> Option<ChipId> {
        let (text, chip) = self.create_chip(entry, false)?;
        let start = range.start;
        self.splice(range, &text);
        let chip = chip?;
        let id = chip.id;
        let span_end = start + text.chars().count().saturating_sub(1);
        if span_end <= start {
            return None;
        }
        if !self.registry.intersecting(start, span_end).is_empty() {
            tracing::warn!(chip = %id, start, end = span_end, "chip text overlaps an attached chip, leaving it as text");
            return None;
        }
        tracing::debug!(chip = %id, title = chip.title(), start, end = span_end, "chip committed");
        self.registry.insert(chip, start..span_end);
        Some(id)
    }

    fn dismiss_suggestions(&mut self) {
        if let Some(suggestions) = self.suggestions.as_mut() {
            suggestions.dismiss();
        }
    }

    fn is_pass_through(&self) -> bool {
        self.suggestions
            .as_ref()
            .is_some_and(|suggestions| suggestions.is_pass_through())
    }

    fn is_valid(&self, text: &str) -> bool {
        self.validator.as_ref().map_or(true, |v| v.is_valid(text))
    }
}
