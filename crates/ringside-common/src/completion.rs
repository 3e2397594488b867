//! Per-category completion state.
//!
//! A [`CompletionMap`] records which checklist items the player has marked
//! complete within one category. Absent keys and keys stored as `false` are
//! equivalent; callers must never rely on the distinction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Item-id to completed-flag mapping for a single category.
///
/// Serializes as a plain JSON object (`{"c1-a": true, ...}`), the shape both
/// persistence tiers store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionMap {
    entries: HashMap<String, bool>,
}

impl CompletionMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the item is marked complete. Absent ids read as `false`.
    #[must_use]
    pub fn is_complete(&self, item_id: &str) -> bool {
        self.entries.get(item_id).copied().unwrap_or(false)
    }

    /// Set an item's completed flag. Storing `false` is equivalent to the
    /// key being absent.
    pub fn set(&mut self, item_id: impl Into<String>, complete: bool) {
        self.entries.insert(item_id.into(), complete);
    }

    /// Flip an item's completed flag and return the new state.
    pub fn toggle(&mut self, item_id: impl Into<String>) -> bool {
        let item_id = item_id.into();
        let next = !self.is_complete(&item_id);
        self.entries.insert(item_id, next);
        next
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of items currently marked complete.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.entries.values().filter(|&&done| done).count()
    }

    /// Ids currently marked complete, sorted for stable output.
    #[must_use]
    pub fn completed_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, &done)| done)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of recorded entries, including explicit `false` values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over recorded `(id, completed)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, &done)| (id.as_str(), done))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for CompletionMap {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(id, done)| (id.into(), done))
                .collect(),
        }
    }
}

/// Rounded completion percentage: `round(completed / total * 100)`.
///
/// An empty checklist reports 0 rather than dividing by zero.
#[must_use]
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (completed as f64 / total as f64) * 100.0;
    pct.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_reads_as_incomplete() {
        let map = CompletionMap::new();
        assert!(!map.is_complete("ach-1"));
        assert_eq!(map.completed_count(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_explicit_false_equals_absent() {
        let mut map = CompletionMap::new();
        map.set("ach-1", false);
        assert!(!map.is_complete("ach-1"));
        assert_eq!(map.completed_count(), 0);
        // Recorded, but not completed.
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_set_and_toggle() {
        let mut map = CompletionMap::new();
        map.set("ach-1", true);
        assert!(map.is_complete("ach-1"));

        assert!(!map.toggle("ach-1"));
        assert!(!map.is_complete("ach-1"));

        assert!(map.toggle("ach-2"));
        assert!(map.is_complete("ach-2"));
    }

    #[test]
    fn test_completed_ids_sorted() {
        let map: CompletionMap = [("c1-b", true), ("c1-a", true), ("c1-c", false)]
            .into_iter()
            .collect();
        assert_eq!(map.completed_ids(), vec!["c1-a", "c1-b"]);
        assert_eq!(map.completed_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut map: CompletionMap = [("a", true)].into_iter().collect();
        map.clear();
        assert!(map.is_empty());
        assert!(!map.is_complete("a"));
    }

    #[test]
    fn test_json_object_shape() {
        let map: CompletionMap = [("c1-a", true), ("c1-b", false)].into_iter().collect();
        let json = serde_json::to_value(&map).expect("serialize");
        assert_eq!(json["c1-a"], serde_json::Value::Bool(true));
        assert_eq!(json["c1-b"], serde_json::Value::Bool(false));

        let parsed: CompletionMap =
            serde_json::from_str(r#"{"c1-a":true,"c1-b":false}"#).expect("deserialize");
        assert!(parsed.is_complete("c1-a"));
        assert!(!parsed.is_complete("c1-b"));
        assert!(!parsed.is_complete("never-recorded"));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(completion_percentage(0, 3), 0);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(3, 3), 100);
        assert_eq!(completion_percentage(1, 2), 50);
    }

    #[test]
    fn test_percentage_empty_checklist() {
        assert_eq!(completion_percentage(0, 0), 0);
    }
}
