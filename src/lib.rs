//! chipsinput - tokenizing chip input
//!
//! This crate turns typed or pasted text into structured "chips" (addresses,
//! tags) laid over a host-owned text buffer, keeping the text and the chip set
//! consistent through edits, selection, paste and programmatic insertion.

pub mod buffer;
pub mod chip;
pub mod config;
pub mod config_paths;
pub mod entry;
pub mod error;
pub mod field;
pub mod history;
pub mod pending;
pub mod registry;
pub mod render;
pub mod rfc822;
pub mod sanitize;
pub mod selection;
pub mod suggestions;
pub mod tasks;
pub mod tokenizer;
pub mod tracing;
pub mod validator;

// Re-export commonly used types
pub use buffer::{RopeBuffer, StringBuffer, TextBuffer, TextBufferMut};
pub use chip::{Chip, ChipId};
pub use config::{ChipsConfig, FocusBehavior};
pub use entry::Entry;
pub use error::{ChipsError, Result};
pub use field::{ChipListener, ChipsField, ChipsFieldBuilder};
pub use render::{ChipRenderer, ChipStyle, TextChipRenderer, VisualHandle};
pub use suggestions::{StaticSuggestions, SuggestionSource};
pub use tokenizer::{AddressTokenizer, Tokenizer};
pub use validator::{DomainValidator, Validator};
