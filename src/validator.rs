//! Pluggable token validation.

use crate::rfc822;

/// Validates tokens before they become chips. A field without a validator
/// treats every token as valid.
pub trait Validator {
    /// Whether `text` is acceptable as-is.
    fn is_valid(&self, text: &str) -> bool;

    /// Best-effort correction of `text`. Returning text that no longer contains
    /// the original token means the token was dropped as unfixable.
    fn fix_text(&self, text: &str) -> String;
}

/// Accepts `local@domain.tld` addresses; can complete bare local parts with a
/// default domain.
#[derive(Debug, Clone, Default)]
pub struct DomainValidator {
    domain: Option<String>,
}

impl DomainValidator {
    pub fn new() -> Self {
        Self { domain: None }
    }

    /// Validator that appends `@domain` to tokens without one
    pub fn with_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
        }
    }

    fn is_valid_address(address: &str) -> bool {
        let Some((local, domain)) = address.split_once('@') else {
            return false;
        };
        if local.is_empty() || local.contains(char::is_whitespace) || domain.contains('@') {
            return false;
        }
        let labels: Vec<&str> = domain.split('.').collect();
        labels.len() >= 2
            && labels.iter().all(|label| {
                !label.is_empty()
                    && label
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '-')
            })
    }
}

impl Validator for DomainValidator {
    fn is_valid(&self, text: &str) -> bool {
        let tokens = rfc822::tokenize(text);
        tokens.len() == 1 && Self::is_valid_address(&tokens[0].address)
    }

    fn fix_text(&self, text: &str) -> String {
        let mut fixed = Vec::new();
        for token in rfc822::tokenize(text) {
            if Self::is_valid_address(&token.address) {
                fixed.push(token.to_string());
                continue;
            }
            let Some(domain) = &self.domain else {
                continue;
            };
            let candidate = format!("{}@{}", token.address, domain);
            if !token.address.contains('@') && Self::is_valid_address(&candidate) {
                let repaired = rfc822::Rfc822Token {
                    address: candidate,
                    ..token
                };
                fixed.push(repaired.to_string());
            }
        }
        fixed.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        let v = DomainValidator::new();
        assert!(v.is_valid("a@x.com"));
        assert!(v.is_valid("Jane <jane@mail.example.org>"));
        assert!(!v.is_valid("a@x"));
        assert!(!v.is_valid("plain"));
        assert!(!v.is_valid("a@x.com, b@x.com"));
    }

    #[test]
    fn test_fix_text_appends_domain() {
        let v = DomainValidator::with_domain("x.com");
        assert_eq!(v.fix_text("alice"), "alice@x.com");
        assert_eq!(v.fix_text("a@x.com"), "a@x.com");
    }

    #[test]
    fn test_fix_text_without_domain_drops_invalid() {
        let v = DomainValidator::new();
        assert_eq!(v.fix_text("alice"), "");
        assert_eq!(v.fix_text("bad token"), "");
    }
}
