// ☑️ Row selection for bulk actions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of selected row ids. Ordered so listings and API output are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Flip membership of a single row
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Select-all over the currently visible rows.
    ///
    /// When every visible row is already selected the set is cleared,
    /// otherwise it becomes exactly the visible ids.
    pub fn toggle_all<'a, I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let visible: BTreeSet<String> = visible.into_iter().map(str::to_string).collect();
        let all_selected = !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id));

        if all_selected {
            self.ids.clear();
        } else {
            self.ids = visible;
        }
    }

    /// True when the visible rows are non-empty and all selected
    pub fn covers<'a, I>(&self, visible: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut any = false;
        for id in visible {
            any = true;
            if !self.ids.contains(id) {
                return false;
            }
        }
        any
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_membership() {
        let mut selection = Selection::new();
        selection.toggle("t1");
        assert!(selection.contains("t1"));
        selection.toggle("t1");
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_selects_exactly_visible() {
        let mut selection = Selection::new();
        selection.toggle("t9");

        selection.toggle_all(["t2", "t5", "t7"]);
        let ids: Vec<_> = selection.ids().collect();
        assert_eq!(ids, vec!["t2", "t5", "t7"]);
        assert!(selection.covers(["t2", "t5", "t7"]));
    }

    #[test]
    fn test_toggle_all_twice_clears() {
        let mut selection = Selection::new();
        selection.toggle_all(["t2", "t5"]);
        selection.toggle_all(["t2", "t5"]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_on_empty_view() {
        let mut selection = Selection::new();
        selection.toggle("t1");
        selection.toggle_all(std::iter::empty());
        assert!(selection.is_empty());
        assert!(!selection.covers(std::iter::empty()));
    }
}
