//! Span registry: disjoint `[start, end)` ranges over the text buffer, each
//! carrying a chip.
//!
//! Spans are kept sorted by start (insertion order among equal starts). The
//! registry also owns the optional "more" marker that stands in for chips
//! hidden by a shrink.
//!
//! Spans are exclusive at both ends: text inserted exactly at a span's start
//! pushes the span right, text inserted exactly at its end is not absorbed.

use std::ops::Range;

use crate::chip::{Chip, ChipId};

#[derive(Debug, Clone, PartialEq)]
struct Span {
    chip: Chip,
    range: Range<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanRegistry {
    spans: Vec<Span>,
    more: Option<Range<usize>>,
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

impl SpanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Attach `chip` to `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty or overlaps an attached chip. Callers must
    /// check with [`SpanRegistry::intersecting`] first.
    pub fn insert(&mut self, chip: Chip, range: Range<usize>) {
        assert!(
            range.start < range.end,
            "empty chip span {:?} for {}",
            range,
            chip.id
        );
        if let Some(existing) = self.spans.iter().find(|s| overlaps(&s.range, &range)) {
            panic!(
                "chip span {:?} for {} overlaps {:?} of {}",
                range, chip.id, existing.range, existing.chip.id
            );
        }
        let at = self.spans.partition_point(|s| s.range.start <= range.start);
        self.spans.insert(at, Span { chip, range });
    }

    /// Detach a chip, returning it with the range it covered.
    pub fn remove(&mut self, id: ChipId) -> Option<(Chip, Range<usize>)> {
        let index = self.spans.iter().position(|s| s.chip.id == id)?;
        let span = self.spans.remove(index);
        Some((span.chip, span.range))
    }

    pub fn clear(&mut self) -> Vec<Chip> {
        self.more = None;
        self.spans.drain(..).map(|s| s.chip).collect()
    }

    pub fn contains(&self, id: ChipId) -> bool {
        self.spans.iter().any(|s| s.chip.id == id)
    }

    pub fn get(&self, id: ChipId) -> Option<&Chip> {
        self.spans.iter().find(|s| s.chip.id == id).map(|s| &s.chip)
    }

    /// Current range of a chip, `None` once it has been detached (stale).
    pub fn chip_range(&self, id: ChipId) -> Option<Range<usize>> {
        self.spans
            .iter()
            .find(|s| s.chip.id == id)
            .map(|s| s.range.clone())
    }

    /// Chips sorted by start.
    pub fn iter(&self) -> impl Iterator<Item = (&Chip, Range<usize>)> + '_ {
        self.spans.iter().map(|s| (&s.chip, s.range.clone()))
    }

    pub fn ids(&self) -> Vec<ChipId> {
        self.spans.iter().map(|s| s.chip.id).collect()
    }

    /// Chips touching `[start, end)`.
    ///
    /// A non-empty query matches spans sharing at least one character with it.
    /// An empty query at `p` matches spans with `start <= p <= end`, so a caret
    /// right behind a chip still finds it.
    pub fn intersecting(&self, start: usize, end: usize) -> Vec<ChipId> {
        self.spans
            .iter()
            .filter(|s| {
                if start == end {
                    s.range.start <= start && start <= s.range.end
                } else {
                    s.range.start < end && start < s.range.end
                }
            })
            .map(|s| s.chip.id)
            .collect()
    }

    /// Chip containing `offset`, inclusive of the chip end.
    pub fn find_chip(&self, offset: usize) -> Option<ChipId> {
        self.spans
            .iter()
            .find(|s| s.range.start <= offset && offset <= s.range.end)
            .map(|s| s.chip.id)
    }

    pub fn first(&self) -> Option<(&Chip, Range<usize>)> {
        self.spans.first().map(|s| (&s.chip, s.range.clone()))
    }

    pub fn last(&self) -> Option<(&Chip, Range<usize>)> {
        self.spans.last().map(|s| (&s.chip, s.range.clone()))
    }

    pub fn more(&self) -> Option<Range<usize>> {
        self.more.clone()
    }

    pub fn set_more(&mut self, range: Range<usize>) {
        self.more = Some(range);
    }

    pub fn clear_more(&mut self) -> Option<Range<usize>> {
        self.more.take()
    }

    /// Move spans through an edit that replaced `deleted` characters at
    /// `start` with `inserted` characters. Spans whose text was deleted
    /// entirely are detached and returned.
    pub fn apply_edit(&mut self, start: usize, deleted: usize, inserted: usize) -> Vec<Chip> {
        let map_start = |offset: usize| {
            if offset < start {
                offset
            } else if offset >= start + deleted {
                offset - deleted + inserted
            } else {
                start + inserted
            }
        };
        let map_end = |offset: usize| {
            if offset <= start {
                offset
            } else if offset >= start + deleted {
                offset - deleted + inserted
            } else {
                start
            }
        };

        let mut detached = Vec::new();
        let mut kept = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            let range = map_start(span.range.start)..map_end(span.range.end);
            if range.start < range.end {
                kept.push(Span {
                    chip: span.chip,
                    range,
                });
            } else {
                tracing::debug!(chip = %span.chip.id, "span collapsed by edit, detaching");
                detached.push(span.chip);
            }
        }
        self.spans = kept;

        if let Some(more) = self.more.take() {
            let range = map_start(more.start)..map_end(more.end);
            if range.start < range.end {
                self.more = Some(range);
            }
        }
        detached
    }

    /// Sorted, non-overlapping, non-empty spans
    pub fn is_consistent(&self) -> bool {
        self.spans.iter().all(|s| s.range.start < s.range.end)
            && self
                .spans
                .windows(2)
                .all(|w| w[0].range.end <= w[1].range.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    fn chip(id: u64, title: &str) -> Chip {
        Chip::new(ChipId(id), Entry::generate_entry(title), title)
    }

    fn registry() -> SpanRegistry {
        // "a@x.com, b@x.com, " with chips over "a@x.com," and "b@x.com,"
        let mut reg = SpanRegistry::new();
        reg.insert(chip(2, "b@x.com"), 9..17);
        reg.insert(chip(1, "a@x.com"), 0..8);
        reg
    }

    #[test]
    fn test_insert_keeps_sorted_order() {
        let reg = registry();
        assert_eq!(reg.ids(), vec![ChipId(1), ChipId(2)]);
        assert!(reg.is_consistent());
    }

    #[test]
    #[should_panic(expected = "overlaps")]
    fn test_overlap_panics() {
        let mut reg = registry();
        reg.insert(chip(3, "c"), 7..10);
    }

    #[test]
    fn test_remove_makes_chip_stale() {
        let mut reg = registry();
        let (removed, range) = reg.remove(ChipId(1)).unwrap();
        assert_eq!(removed.title(), "a@x.com");
        assert_eq!(range, 0..8);
        assert_eq!(reg.chip_range(ChipId(1)), None);
        assert!(reg.remove(ChipId(1)).is_none());
    }

    #[test]
    fn test_intersecting_empty_query_touches_end() {
        let reg = registry();
        assert_eq!(reg.intersecting(8, 8), vec![ChipId(1)]);
        assert_eq!(reg.intersecting(9, 9), vec![ChipId(2)]);
        assert!(reg.intersecting(8, 9).is_empty());
        assert_eq!(reg.intersecting(5, 12), vec![ChipId(1), ChipId(2)]);
    }

    #[test]
    fn test_find_chip_inclusive_end() {
        let reg = registry();
        assert_eq!(reg.find_chip(8), Some(ChipId(1)));
        assert_eq!(reg.find_chip(17), Some(ChipId(2)));
        assert_eq!(reg.find_chip(18), None);
    }

    #[test]
    fn test_apply_edit_insert_before_shifts() {
        let mut reg = registry();
        assert!(reg.apply_edit(0, 0, 3).is_empty());
        assert_eq!(reg.chip_range(ChipId(1)), Some(3..11));
        assert_eq!(reg.chip_range(ChipId(2)), Some(12..20));
    }

    #[test]
    fn test_apply_edit_insert_at_end_not_absorbed() {
        let mut reg = registry();
        reg.apply_edit(8, 0, 2);
        assert_eq!(reg.chip_range(ChipId(1)), Some(0..8));
        assert_eq!(reg.chip_range(ChipId(2)), Some(11..19));
    }

    #[test]
    fn test_apply_edit_delete_detaches_collapsed() {
        let mut reg = registry();
        let detached = reg.apply_edit(0, 9, 0);
        assert_eq!(detached.len(), 1);
        assert_eq!(detached[0].id, ChipId(1));
        assert_eq!(reg.chip_range(ChipId(2)), Some(0..8));
    }

    #[test]
    fn test_apply_edit_partial_delete_shrinks() {
        let mut reg = registry();
        reg.apply_edit(5, 2, 0);
        assert_eq!(reg.chip_range(ChipId(1)), Some(0..6));
    }

    #[test]
    fn test_more_marker_moves_and_collapses() {
        let mut reg = SpanRegistry::new();
        reg.set_more(4..6);
        reg.apply_edit(0, 0, 1);
        assert_eq!(reg.more(), Some(5..7));
        reg.apply_edit(4, 4, 0);
        assert_eq!(reg.more(), None);
    }
}
