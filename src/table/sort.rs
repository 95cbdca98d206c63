//! Ordered multi-column sort with the `unsorted -> asc -> desc -> unsorted` cycle.

use crate::codec::{SortDirection, SortEntry};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    entries: Vec<SortEntry>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<SortEntry>) -> Self {
        Self { entries }
    }

    /// Advance `field` one step. New columns are appended; existing ones keep their position
    /// and are dropped once they cycle back to unsorted. Returns the column's new direction.
    pub fn toggle(&mut self, field: &str) -> Option<SortDirection> {
        match self.entries.iter().position(|e| e.field == field) {
            None => {
                self.entries.push(SortEntry::new(field, SortDirection::Asc));
                Some(SortDirection::Asc)
            }
            Some(i) => match self.entries[i].direction.unwrap_or_default() {
                SortDirection::Asc => {
                    self.entries[i].direction = Some(SortDirection::Desc);
                    Some(SortDirection::Desc)
                }
                SortDirection::Desc => {
                    self.entries.remove(i);
                    None
                }
            },
        }
    }

    /// Direction and 1-based precedence of `field`, if sorted.
    pub fn position(&self, field: &str) -> Option<(SortDirection, usize)> {
        self.entries
            .iter()
            .position(|e| e.field == field)
            .map(|i| (self.entries[i].direction.unwrap_or_default(), i + 1))
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
