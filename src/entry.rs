//! Chip entries: identity and display text of a chip, and the rules that turn
//! a raw token into one.

use crate::rfc822;
use crate::tokenizer::Tokenizer;
use crate::validator::Validator;

/// Identity and display text of a chip. Never mutated once built; a new entry
/// is built when the text changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: Option<i64>,
    title: String,
    valid: bool,
}

impl Entry {
    /// Entry with a known id, e.g. an item of a suggestion source.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            valid: true,
        }
    }

    /// Entry holding `raw` verbatim.
    pub fn generate_entry(raw: &str) -> Self {
        Self {
            id: None,
            title: raw.to_string(),
            valid: true,
        }
    }

    /// Entry holding the address portion of a `name <address>` token, or the
    /// raw text when no address can be extracted.
    pub fn generate_tokenized_entry(raw: &str) -> Self {
        let title = rfc822::tokenize(raw)
            .into_iter()
            .next()
            .map(|token| token.address)
            .filter(|address| !address.is_empty())
            .unwrap_or_else(|| raw.to_string());
        Self {
            id: None,
            title,
            valid: true,
        }
    }

    pub fn with_id(mut self, id: Option<i64>) -> Self {
        self.id = id;
        self
    }

    fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// False for chips built from tokens the validator rejected; such chips
    /// stay editable so the user can correct them.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Build an entry from a raw token typed or pasted into the field.
///
/// Returns `None` only for an empty token. Tokens that fail validation and
/// cannot be fixed still produce an (invalid) entry.
pub fn create_tokenized_entry(token: &str, validator: Option<&dyn Validator>) -> Option<Entry> {
    if token.is_empty() {
        return None;
    }

    let tokens = rfc822::tokenize(token);
    let mut is_valid = validator.map_or(true, |v| v.is_valid(token));
    if is_valid {
        if let Some(first) = tokens.first() {
            if !first.name.is_empty() {
                return Some(Entry::generate_entry(&first.address));
            }
            if !first.address.is_empty() {
                return Some(Entry::generate_tokenized_entry(&first.address));
            }
        }
    }

    let mut validated = None;
    if let Some(validator) = validator {
        if !is_valid {
            let fixed = validator.fix_text(token);
            if !fixed.is_empty() {
                if fixed.contains(token) {
                    // The validator only completed the token (e.g. added a domain)
                    if let Some(first) = rfc822::tokenize(&fixed).into_iter().next() {
                        validated = Some(first.address);
                        is_valid = true;
                    }
                } else {
                    tracing::debug!(token, fixed = %fixed, "validator dropped token, keeping original");
                    validated = None;
                    is_valid = false;
                }
            }
        }
    }

    let entry = Entry::generate_tokenized_entry(validated.as_deref().unwrap_or(token));
    Some(if is_valid { entry } else { entry.invalid() })
}

/// Entry for an item chosen from the suggestion list. The item's id is kept.
pub fn create_validated_entry(item: &Entry, validator: Option<&dyn Validator>) -> Option<Entry> {
    let entry = Entry::generate_tokenized_entry(item.title()).with_id(item.id());
    if item.title().is_empty() {
        return None;
    }
    match validator {
        Some(v) if !v.is_valid(item.title()) => Some(entry.invalid()),
        _ => Some(entry),
    }
}

/// Canonical buffer text of a chip: its address followed by the separator.
pub fn address_text(entry: &Entry, tokenizer: &dyn Tokenizer) -> String {
    let address = rfc822::tokenize(entry.title())
        .into_iter()
        .next()
        .map(|token| token.address)
        .filter(|address| !address.is_empty())
        .unwrap_or_else(|| entry.title().to_string());
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    tokenizer.terminate_token(trimmed)
}

/// Text handed to the renderer for a chip.
pub fn display_text(entry: &Entry) -> &str {
    entry.title()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::AddressTokenizer;
    use crate::validator::DomainValidator;

    #[test]
    fn test_generate_tokenized_entry_extracts_address() {
        let entry = Entry::generate_tokenized_entry("John <john@x.com>");
        assert_eq!(entry.title(), "john@x.com");
        assert_eq!(entry.id(), None);
    }

    #[test]
    fn test_generate_entry_is_verbatim() {
        let entry = Entry::generate_entry("John <john@x.com>");
        assert_eq!(entry.title(), "John <john@x.com>");
    }

    #[test]
    fn test_empty_token_has_no_entry() {
        assert!(create_tokenized_entry("", None).is_none());
    }

    #[test]
    fn test_named_token_uses_address() {
        let entry = create_tokenized_entry("Jane Roe <jane@x.com>", None).unwrap();
        assert_eq!(entry.title(), "jane@x.com");
        assert!(entry.is_valid());
    }

    #[test]
    fn test_no_validator_accepts_anything() {
        let entry = create_tokenized_entry("Chip1", None).unwrap();
        assert_eq!(entry.title(), "Chip1");
        assert!(entry.is_valid());
    }

    #[test]
    fn test_validator_fix_completes_token() {
        let validator = DomainValidator::with_domain("x.com");
        let entry = create_tokenized_entry("alice", Some(&validator)).unwrap();
        assert_eq!(entry.title(), "alice@x.com");
        assert!(entry.is_valid());
    }

    #[test]
    fn test_validator_dropping_token_keeps_original_as_invalid() {
        let validator = DomainValidator::new();
        let entry = create_tokenized_entry("not valid!", Some(&validator)).unwrap();
        assert_eq!(entry.title(), "not valid!");
        assert!(!entry.is_valid());
    }

    #[test]
    fn test_validated_entry_keeps_id() {
        let item = Entry::new(7, "Suggest1");
        let entry = create_validated_entry(&item, None).unwrap();
        assert_eq!(entry.id(), Some(7));
        assert_eq!(entry.title(), "Suggest1");
        assert!(create_validated_entry(&Entry::generate_entry(""), None).is_none());
    }

    #[test]
    fn test_address_text_is_terminated() {
        let tokenizer = AddressTokenizer::new();
        assert_eq!(
            address_text(&Entry::generate_entry("a@x.com"), &tokenizer),
            "a@x.com, "
        );
        assert_eq!(address_text(&Entry::generate_entry(" "), &tokenizer), "");
    }
}
