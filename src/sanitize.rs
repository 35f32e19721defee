//! Invariant-restoring passes around chips.
//!
//! Both passes only compute the ranges to delete; the field applies them so
//! the registry and the caret move with the text. Ranges are returned in
//! descending order, so deleting them one after another never invalidates the
//! ranges still to come.

use std::ops::Range;

use crate::buffer::TextBuffer;
use crate::registry::SpanRegistry;
use crate::tokenizer::COMMIT_CHAR_SPACE;

/// Text after the last chip (or after the more marker) beyond its single
/// trailing space.
pub fn trailing_excess<B: TextBuffer + ?Sized>(
    buffer: &B,
    registry: &SpanRegistry,
) -> Option<Range<usize>> {
    let end = match registry.more() {
        Some(more) => more.end,
        None => registry.last()?.1.end,
    };
    let len = buffer.len_chars();
    let keep = if buffer.char_at(end) == Some(COMMIT_CHAR_SPACE) {
        end + 1
    } else {
        end
    };
    (len > keep).then_some(keep..len)
}

/// Text between adjacent chips beyond a single separating space.
pub fn gap_excess<B: TextBuffer + ?Sized>(buffer: &B, registry: &SpanRegistry) -> Vec<Range<usize>> {
    let ranges: Vec<Range<usize>> = registry.iter().map(|(_, range)| range).collect();
    let mut out = Vec::new();
    for pair in ranges.windows(2).rev() {
        let mut start = pair[0].end;
        if buffer.char_at(start) == Some(COMMIT_CHAR_SPACE) {
            start += 1;
        }
        if start < pair[1].start {
            out.push(start..pair[1].start);
        }
    }
    out
}
