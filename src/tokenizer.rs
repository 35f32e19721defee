//! Token boundaries over the field text.
//!
//! Tokens are separated by a comma or semicolon, conventionally followed by a
//! single space. Separators that appear inside quoted strings, `(comments)` or
//! `<addresses>` do not split tokens.

/// Comma: commits the current token.
pub const COMMIT_CHAR_COMMA: char = ',';
/// Semicolon: commits the current token.
pub const COMMIT_CHAR_SEMICOLON: char = ';';
/// Space: commits only when the token so far validates.
pub const COMMIT_CHAR_SPACE: char = ' ';
/// Canonical separator appended after every chip.
pub const SEPARATOR: &str = ", ";

/// Whether `ch` finalizes a token into a chip.
pub fn is_commit_char(ch: char) -> bool {
    ch == COMMIT_CHAR_COMMA || ch == COMMIT_CHAR_SEMICOLON
}

/// Locates token boundaries in a text. Offsets are character offsets.
pub trait Tokenizer {
    /// Start of the token that ends at `cursor`.
    fn find_token_start(&self, text: &str, cursor: usize) -> usize;

    /// End of the token starting at `cursor` (offset of its terminator, or the
    /// text length).
    fn find_token_end(&self, text: &str, cursor: usize) -> usize;

    /// `text` with the canonical separator appended unless already terminated.
    fn terminate_token(&self, text: &str) -> String;
}

/// Default tokenizer: comma/semicolon separated, address aware.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressTokenizer;

impl AddressTokenizer {
    pub fn new() -> Self {
        Self
    }

    fn token_end(chars: &[char], cursor: usize) -> usize {
        let len = chars.len();
        let mut i = cursor;
        while i < len {
            match chars[i] {
                c if is_commit_char(c) => return i,
                '"' => {
                    i += 1;
                    while i < len {
                        match chars[i] {
                            '"' => {
                                i += 1;
                                break;
                            }
                            '\\' if i + 1 < len => i += 2,
                            _ => i += 1,
                        }
                    }
                }
                '(' => {
                    let mut level = 1;
                    i += 1;
                    while i < len && level > 0 {
                        match chars[i] {
                            ')' => level -= 1,
                            '(' => level += 1,
                            '\\' if i + 1 < len => i += 1,
                            _ => {}
                        }
                        i += 1;
                    }
                }
                '<' => {
                    i += 1;
                    while i < len {
                        let c = chars[i];
                        i += 1;
                        if c == '>' {
                            break;
                        }
                    }
                }
                _ => i += 1,
            }
        }
        i.min(len)
    }
}

impl Tokenizer for AddressTokenizer {
    fn find_token_start(&self, text: &str, cursor: usize) -> usize {
        let chars: Vec<char> = text.chars().collect();
        let cursor = cursor.min(chars.len());
        let mut best = 0;
        let mut i = 0;
        while i < cursor {
            i = Self::token_end(&chars, i);
            if i < cursor {
                // Skip terminating punctuation and the following spaces
                i += 1;
                while i < cursor && chars[i] == ' ' {
                    i += 1;
                }
                if i < cursor {
                    best = i;
                }
            }
        }
        best
    }

    fn find_token_end(&self, text: &str, cursor: usize) -> usize {
        let chars: Vec<char> = text.chars().collect();
        Self::token_end(&chars, cursor.min(chars.len()))
    }

    fn terminate_token(&self, text: &str) -> String {
        let trimmed = text.trim_end_matches(' ');
        match trimmed.chars().last() {
            Some(last) if is_commit_char(last) => text.to_string(),
            _ => format!("{}{}", text, SEPARATOR),
        }
    }
}

/// A token is completed when its trailing (post-trim) character is a commit
/// character. Completed tokens are never filtered against suggestions.
pub fn is_completed_token(tokenizer: &dyn Tokenizer, text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let end = text.chars().count();
    let start = tokenizer.find_token_start(text, end);
    let token: String = text.chars().skip(start).collect();
    token.trim().chars().last().is_some_and(is_commit_char)
}

/// Step over one commit character at `token_end` and one following space.
pub fn move_past_terminators(text: &str, token_end: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut end = token_end;
    if end >= chars.len() {
        return end;
    }
    if is_commit_char(chars[end]) {
        end += 1;
    }
    if end < chars.len() && chars[end] == COMMIT_CHAR_SPACE {
        end += 1;
    }
    end
}
