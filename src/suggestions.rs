//! Suggestion source consumed by the field.
//!
//! The dropdown UI lives in the host; the field only asks the source to filter
//! on the token being typed and, on commit, may take its first item.

use crate::entry::Entry;

pub trait SuggestionSource {
    /// Number of items matching the last query
    fn count(&self) -> usize;

    /// Matching item at `index`; `None` for a null selection
    fn item(&self, index: usize) -> Option<Entry>;

    /// Re-run the match against `query`
    fn filter(&mut self, query: &str);

    /// Hide the list
    fn dismiss(&mut self) {}

    /// Queries that must be committed as typed (never replaced by item 0)
    fn is_pass_through(&self) -> bool {
        false
    }
}

/// In-memory source matching case-insensitively on a substring of the title.
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestions {
    items: Vec<Entry>,
    matches: Vec<usize>,
    pass_through: bool,
}

impl StaticSuggestions {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| Entry::new(i as i64, title))
            .collect();
        Self {
            items,
            matches: Vec::new(),
            pass_through: false,
        }
    }

    pub fn set_pass_through(&mut self, pass_through: bool) {
        self.pass_through = pass_through;
    }
}

impl SuggestionSource for StaticSuggestions {
    fn count(&self) -> usize {
        self.matches.len()
    }

    fn item(&self, index: usize) -> Option<Entry> {
        self.matches
            .get(index)
            .and_then(|&i| self.items.get(i))
            .cloned()
    }

    fn filter(&mut self, query: &str) {
        let query = query.trim().to_lowercase();
        self.matches = if query.is_empty() {
            Vec::new()
        } else {
            self.items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.title().to_lowercase().contains(&query))
                .map(|(i, _)| i)
                .collect()
        };
        tracing::trace!(query = %query, matches = self.matches.len(), "filtered suggestions");
    }

    fn dismiss(&mut self) {
        self.matches.clear();
    }

    fn is_pass_through(&self) -> bool {
        self.pass_through
    }
}
