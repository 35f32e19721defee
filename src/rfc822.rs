//! Minimal RFC-822 address splitting.
//!
//! Splits `"Name" <address> (comment)` style strings into their parts. Only
//! what the chip field needs: a display name, an address and an optional
//! comment per comma/semicolon separated item.

use std::fmt;

/// One address item of a tokenized string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rfc822Token {
    pub name: String,
    pub address: String,
    pub comment: String,
}

impl Rfc822Token {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            comment: String::new(),
        }
    }

    fn quote_name_if_necessary(name: &str) -> String {
        let needs_quotes = name
            .chars()
            .any(|c| !(c.is_alphanumeric() || c == ' ' || c == '-' || c == '.' || c == '_'));
        if needs_quotes {
            let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", escaped)
        } else {
            name.to_string()
        }
    }
}

impl fmt::Display for Rfc822Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        if !self.name.is_empty() {
            out.push_str(&Self::quote_name_if_necessary(&self.name));
            out.push(' ');
        }
        if !self.comment.is_empty() {
            out.push('(');
            out.push_str(&self.comment);
            out.push_str(") ");
        }
        if !self.address.is_empty() {
            out.push('<');
            out.push_str(&self.address);
            out.push('>');
        }
        // A bare address renders without brackets
        if self.name.is_empty() && self.comment.is_empty() {
            return f.write_str(&self.address);
        }
        f.write_str(&out)
    }
}

/// Split `text` into address items.
///
/// Text outside of quotes, comments and angle brackets becomes the name when
/// an `<address>` is present, otherwise it is the address itself.
pub fn tokenize(text: &str) -> Vec<Rfc822Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut name = String::new();
    let mut address = String::new();
    let mut comment = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ',' | ';' => {
                i += 1;
                while i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }
                push_token(&mut out, &mut name, &mut address, &mut comment);
            }
            '"' => {
                i += 1;
                while i < chars.len() {
                    match chars[i] {
                        '"' => {
                            i += 1;
                            break;
                        }
                        '\\' => {
                            if i + 1 < chars.len() {
                                name.push(chars[i + 1]);
                            }
                            i += 2;
                        }
                        ch => {
                            name.push(ch);
                            i += 1;
                        }
                    }
                }
            }
            '(' => {
                let mut level = 1;
                i += 1;
                while i < chars.len() && level > 0 {
                    match chars[i] {
                        ')' => {
                            if level > 1 {
                                comment.push(')');
                            }
                            level -= 1;
                            i += 1;
                        }
                        '(' => {
                            comment.push('(');
                            level += 1;
                            i += 1;
                        }
                        '\\' => {
                            if i + 1 < chars.len() {
                                comment.push(chars[i + 1]);
                            }
                            i += 2;
                        }
                        ch => {
                            comment.push(ch);
                            i += 1;
                        }
                    }
                }
            }
            '<' => {
                i += 1;
                while i < chars.len() {
                    let ch = chars[i];
                    i += 1;
                    if ch == '>' {
                        break;
                    }
                    address.push(ch);
                }
            }
            ' ' => {
                name.push('\0');
                i += 1;
            }
            _ => {
                name.push(c);
                i += 1;
            }
        }
    }
    push_token(&mut out, &mut name, &mut address, &mut comment);
    out
}

fn push_token(
    out: &mut Vec<Rfc822Token>,
    name: &mut String,
    address: &mut String,
    comment: &mut String,
) {
    // Unquoted spaces were recorded as NUL so runs can collapse to one space
    let collapsed = name
        .split('\0')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let collapsed = collapsed.trim().to_string();

    if address.trim().is_empty() {
        if !collapsed.is_empty() || !comment.is_empty() {
            out.push(Rfc822Token {
                name: String::new(),
                address: collapsed,
                comment: comment.trim().to_string(),
            });
        }
    } else {
        out.push(Rfc822Token {
            name: collapsed,
            address: address.trim().to_string(),
            comment: comment.trim().to_string(),
        });
    }
    name.clear();
    address.clear();
    comment.clear();
}
