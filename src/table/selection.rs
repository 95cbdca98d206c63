//! Row selection keyed by the schema's id field.

use crate::error::ConfigError;
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

/// What happens to selected ids when a new page of rows replaces the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Keep every selected id, even ones not on the new page.
    #[default]
    Retain,
    /// Drop ids not present in the newly loaded rows.
    PruneToPage,
}

impl FromStr for SelectionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(SelectionPolicy::Retain),
            "prune" | "prune_to_page" => Ok(SelectionPolicy::PruneToPage),
            other => Err(ConfigError::Load(format!("unknown selection policy '{}'", other))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn select(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn retain_only(&mut self, keep: &HashSet<String>) {
        self.ids.retain(|id| keep.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy() {
        assert_eq!("Retain".parse::<SelectionPolicy>().unwrap(), SelectionPolicy::Retain);
        assert_eq!("prune".parse::<SelectionPolicy>().unwrap(), SelectionPolicy::PruneToPage);
        assert!("sometimes".parse::<SelectionPolicy>().is_err());
    }

    #[test]
    fn toggle_and_retain_only() {
        let mut s = Selection::default();
        assert!(s.toggle("1"));
        s.select("2");
        assert!(!s.toggle("1"));
        s.select("3");
        s.retain_only(&["3".to_string()].into_iter().collect());
        assert_eq!(s.ids(), vec!["3".to_string()]);
    }
}
