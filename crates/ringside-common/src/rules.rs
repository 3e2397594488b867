//! Declarative unlock rule tables.
//!
//! Each tracked category (game mode) is described by a [`GuideDef`]: its
//! checklist items, their mutual-exclusion groups, and an ordered list of
//! [`ChapterRule`]s. The tables are plain data; all gating decisions are
//! made by the evaluator in [`crate::unlock`], so every mode runs through
//! the same logic.

use serde::{Deserialize, Serialize};

use crate::completion::CompletionMap;

// ============================================================================
// Checklist items
// ============================================================================

/// One manually-checkable task within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Stable identifier, unique within the category.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Longer description of what the task requires.
    #[serde(default)]
    pub description: String,
    /// Reward text shown when the task is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
    /// Mutual-exclusion siblings: while any listed id is complete, this
    /// item cannot be checked. Symmetry is the table author's job; the
    /// evaluator never infers it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group: Vec<String>,
}

impl ChecklistItem {
    /// Create an item with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            reward: None,
            group: Vec::new(),
        }
    }

    /// Set the description text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the reward text.
    #[must_use]
    pub fn with_reward(mut self, reward: impl Into<String>) -> Self {
        self.reward = Some(reward.into());
        self
    }

    /// Set the mutual-exclusion sibling ids.
    #[must_use]
    pub fn with_group<I, S>(mut self, siblings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group = siblings.into_iter().map(Into::into).collect();
        self
    }

    /// True when this item participates in a mutual-exclusion group.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        !self.group.is_empty()
    }
}

// ============================================================================
// Chapter predicates
// ============================================================================

/// Completion predicate over item ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockPredicate {
    /// Every listed item must be complete. An empty list is vacuously
    /// satisfied, which makes an item-less chapter always-done.
    AllOf {
        /// Item ids that must all be complete.
        items: Vec<String>,
    },
    /// At least one listed item must be complete. An empty list is never
    /// satisfied.
    AnyOf {
        /// Item ids of which one suffices.
        items: Vec<String>,
    },
    /// Conjunction of ANY-OF groups: each group must have at least one
    /// complete item (e.g. "one male-side pick and one female-side pick").
    EachGroupAny {
        /// Groups of item ids; one hit required per group.
        groups: Vec<Vec<String>>,
    },
}

impl UnlockPredicate {
    /// ALL-OF predicate over the given ids.
    pub fn all_of<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllOf {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// ANY-OF predicate over the given ids.
    pub fn any_of<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Conjunction of ANY-OF groups.
    pub fn each_group_any<G, I, S>(groups: G) -> Self
    where
        G: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::EachGroupAny {
            groups: groups
                .into_iter()
                .map(|group| group.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Evaluate the predicate against a completion map.
    #[must_use]
    pub fn evaluate(&self, map: &CompletionMap) -> bool {
        match self {
            Self::AllOf { items } => items.iter().all(|id| map.is_complete(id)),
            Self::AnyOf { items } => items.iter().any(|id| map.is_complete(id)),
            Self::EachGroupAny { groups } => groups
                .iter()
                .all(|group| group.iter().any(|id| map.is_complete(id))),
        }
    }

    /// Every item id the predicate references, in table order.
    #[must_use]
    pub fn referenced_items(&self) -> Vec<&str> {
        match self {
            Self::AllOf { items } | Self::AnyOf { items } => {
                items.iter().map(String::as_str).collect()
            },
            Self::EachGroupAny { groups } => groups
                .iter()
                .flat_map(|group| group.iter().map(String::as_str))
                .collect(),
        }
    }
}

/// One ordered chapter (or phase/match/zone) within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRule {
    /// Display title.
    pub title: String,
    /// Completion predicate.
    pub predicate: UnlockPredicate,
}

impl ChapterRule {
    /// Create a chapter with an explicit predicate.
    pub fn new(title: impl Into<String>, predicate: UnlockPredicate) -> Self {
        Self {
            title: title.into(),
            predicate,
        }
    }

    /// Chapter completed by finishing every listed item.
    pub fn all_of<I, S>(title: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(title, UnlockPredicate::all_of(items))
    }

    /// Chapter completed by finishing any one of the listed items.
    pub fn any_of<I, S>(title: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(title, UnlockPredicate::any_of(items))
    }

    /// Whether the chapter's predicate holds for the given map.
    #[must_use]
    pub fn is_done(&self, map: &CompletionMap) -> bool {
        self.predicate.evaluate(map)
    }
}

// ============================================================================
// Guide definitions
// ============================================================================

/// Static definition of one tracked category: its key, items, and chapter
/// chain. An empty chapter list models a flat checklist (achievements).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideDef {
    /// Category key used for persistence (`<key>-progress`).
    pub key: String,
    /// Display title.
    pub title: String,
    /// All checklist items in table order.
    pub items: Vec<ChecklistItem>,
    /// Ordered chapter rules; chapter N unlocks when chapter N-1 is done.
    pub chapters: Vec<ChapterRule>,
}

impl GuideDef {
    /// Create an empty guide definition.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            items: Vec::new(),
            chapters: Vec::new(),
        }
    }

    /// Append a checklist item.
    #[must_use]
    pub fn with_item(mut self, item: ChecklistItem) -> Self {
        self.items.push(item);
        self
    }

    /// Append a chapter rule.
    #[must_use]
    pub fn with_chapter(mut self, chapter: ChapterRule) -> Self {
        self.chapters.push(chapter);
        self
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// True when the id belongs to this guide.
    #[must_use]
    pub fn contains_item(&self, item_id: &str) -> bool {
        self.item(item_id).is_some()
    }

    /// Mutual-exclusion siblings for an item; empty for ungrouped or
    /// unknown ids.
    #[must_use]
    pub fn item_group(&self, item_id: &str) -> &[String] {
        self.item(item_id).map_or(&[], |item| item.group.as_slice())
    }

    /// Number of checklist items.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Number of chapters.
    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// True for chapter-less flat checklists.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Table-order ids of every item.
    #[must_use]
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }

    /// Check table consistency: unique item ids, and every id referenced by
    /// a chapter predicate or mutual-exclusion group must exist. Returns
    /// the first offending id.
    pub fn validate(&self) -> Result<(), String> {
        for (idx, item) in self.items.iter().enumerate() {
            if self.items[..idx].iter().any(|prev| prev.id == item.id) {
                return Err(format!("duplicate item id: {}", item.id));
            }
        }
        for item in &self.items {
            for sibling in &item.group {
                if !self.contains_item(sibling) {
                    return Err(format!(
                        "item {} references unknown group sibling {sibling}",
                        item.id
                    ));
                }
            }
        }
        for chapter in &self.chapters {
            for id in chapter.predicate.referenced_items() {
                if !self.contains_item(id) {
                    return Err(format!(
                        "chapter '{}' references unknown item {id}",
                        chapter.title
                    ));
                }
            }
        }
        Ok(())
    }
}
