//! Per-row expansion state for tables with nested line items

use std::collections::HashSet;

/// Ids of expanded entities. Toggling one id never touches another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows {
    ids: HashSet<String>,
}

impl ExpandedRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row, returning whether it is now expanded
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Reset on navigation
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_independent_per_row() {
        let mut rows = ExpandedRows::new();
        rows.toggle("b");
        let before_b = rows.is_expanded("b");

        assert!(rows.toggle("a"));
        assert!(rows.is_expanded("a"));
        assert_eq!(rows.is_expanded("b"), before_b);

        assert!(!rows.toggle("a"));
        assert!(!rows.is_expanded("a"));
        assert_eq!(rows.is_expanded("b"), before_b);
    }

    #[test]
    fn test_clear() {
        let mut rows = ExpandedRows::new();
        rows.toggle("a");
        rows.toggle("b");
        assert_eq!(rows.len(), 2);
        rows.clear();
        assert!(rows.is_empty());
    }
}
