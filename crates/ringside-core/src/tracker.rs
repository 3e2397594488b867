//! Per-category progress tracking.
//!
//! A [`GuideTracker`] pairs one [`GuideDef`] with its [`CompletionMap`] and
//! applies the evaluator on every query. It owns no persistence: callers
//! load the map from [`crate::progress::ProgressStore`], feed toggles
//! through [`GuideTracker::toggle`], and save the map back out. Derived
//! state (disabled items, chapter locks, the current-chapter cursor) is
//! never stored, so reversing a prerequisite re-locks dependents on the
//! very next query.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ringside_common::completion::{completion_percentage, CompletionMap};
use ringside_common::rules::GuideDef;
use ringside_common::unlock::{current_chapter, is_chapter_unlocked, is_item_disabled};

/// Errors from checklist interaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuideError {
    /// The id does not belong to this guide's checklist.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The item's mutual-exclusion group has a completed sibling, so the
    /// toggle is refused until that sibling is unchecked.
    #[error("item locked by a completed alternative: {0}")]
    ItemLocked(String),
}

/// Result type for guide operations.
pub type GuideResult<T> = Result<T, GuideError>;

/// Display snapshot of one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterStatus {
    /// 1-based chapter number.
    pub number: usize,
    /// Chapter title.
    pub title: String,
    /// Whether the chapter is interactive.
    pub unlocked: bool,
    /// Whether the chapter's completion predicate holds.
    pub done: bool,
}

/// Completion statistics for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    /// Items currently marked complete.
    pub completed: usize,
    /// Items in the guide's checklist.
    pub total: usize,
    /// `round(completed / total * 100)`, 0 for an empty checklist.
    pub percentage: u8,
}

/// In-memory state object for one tracked category.
#[derive(Debug, Clone)]
pub struct GuideTracker {
    guide: GuideDef,
    map: CompletionMap,
}

impl GuideTracker {
    /// Create a tracker with an empty completion map.
    #[must_use]
    pub fn new(guide: GuideDef) -> Self {
        Self {
            guide,
            map: CompletionMap::new(),
        }
    }

    /// Create a tracker over a previously loaded map.
    #[must_use]
    pub fn with_map(guide: GuideDef, map: CompletionMap) -> Self {
        Self { guide, map }
    }

    /// The static guide definition.
    #[must_use]
    pub fn guide(&self) -> &GuideDef {
        &self.guide
    }

    /// The current completion map, for persistence.
    #[must_use]
    pub fn map(&self) -> &CompletionMap {
        &self.map
    }

    /// Replace the completion map, e.g. after a login reconciliation pull.
    pub fn set_map(&mut self, map: CompletionMap) {
        self.map = map;
    }

    /// Whether an item is currently marked complete.
    #[must_use]
    pub fn is_complete(&self, item_id: &str) -> bool {
        self.map.is_complete(item_id)
    }

    /// Whether an item's checkbox is locked by its mutual-exclusion group.
    /// Unknown ids read as enabled; [`toggle`](Self::toggle) rejects them.
    #[must_use]
    pub fn is_item_disabled(&self, item_id: &str) -> bool {
        is_item_disabled(&self.map, item_id, self.guide.item_group(item_id))
    }

    /// Flip an item's completed flag and return the new state.
    ///
    /// Refused with [`GuideError::UnknownItem`] for ids outside the guide
    /// and [`GuideError::ItemLocked`] while a group sibling is complete.
    /// A completed item can always be unchecked.
    pub fn toggle(&mut self, item_id: &str) -> GuideResult<bool> {
        if !self.guide.contains_item(item_id) {
            return Err(GuideError::UnknownItem(item_id.to_string()));
        }
        if self.is_item_disabled(item_id) {
            return Err(GuideError::ItemLocked(item_id.to_string()));
        }
        Ok(self.map.toggle(item_id))
    }

    /// Whether the chapter at `index` (0-based) is unlocked.
    #[must_use]
    pub fn is_chapter_unlocked(&self, index: usize) -> bool {
        is_chapter_unlocked(&self.map, &self.guide.chapters, index)
    }

    /// Whether the chapter at `index` (0-based) is done.
    #[must_use]
    pub fn is_chapter_done(&self, index: usize) -> bool {
        self.guide
            .chapters
            .get(index)
            .is_some_and(|rule| rule.is_done(&self.map))
    }

    /// 1-based number of the first unfinished chapter; one past the table
    /// once everything is done.
    #[must_use]
    pub fn current_chapter(&self) -> usize {
        current_chapter(&self.map, &self.guide.chapters)
    }

    /// Display snapshot of every chapter in order.
    #[must_use]
    pub fn chapter_statuses(&self) -> Vec<ChapterStatus> {
        self.guide
            .chapters
            .iter()
            .enumerate()
            .map(|(index, rule)| ChapterStatus {
                number: index + 1,
                title: rule.title.clone(),
                unlocked: self.is_chapter_unlocked(index),
                done: rule.is_done(&self.map),
            })
            .collect()
    }

    /// Completion statistics over the guide's checklist.
    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        let completed = self.map.completed_count();
        let total = self.guide.total_items();
        ProgressStats {
            completed,
            total,
            percentage: completion_percentage(completed, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringside_common::rules::{ChapterRule, ChecklistItem};

    /// Chapter 1 = ALL-OF {c1-a, c1-b}; chapter 2 = grouped ANY-OF
    /// {c2-a, c2-b, c2-c}.
    fn story_guide() -> GuideDef {
        let picks = ["c2-a", "c2-b", "c2-c"];
        let mut guide = GuideDef::new("story", "Story Mode")
            .with_item(ChecklistItem::new("c1-a", "Opening promo"))
            .with_item(ChecklistItem::new("c1-b", "Dark match"));
        for id in picks {
            guide = guide.with_item(ChecklistItem::new(id, "Pick").with_group(picks));
        }
        guide
            .with_chapter(ChapterRule::all_of("Debut", ["c1-a", "c1-b"]))
            .with_chapter(ChapterRule::any_of("The Choice", picks))
    }

    fn flat_achievements() -> GuideDef {
        GuideDef::new("achievements", "Achievements")
            .with_item(ChecklistItem::new("ach-1", "First win"))
            .with_item(ChecklistItem::new("ach-2", "Title match"))
            .with_item(ChecklistItem::new("ach-3", "Hall of fame"))
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut tracker = GuideTracker::new(flat_achievements());
        assert_eq!(tracker.toggle("ach-1"), Ok(true));
        assert!(tracker.is_complete("ach-1"));
        assert_eq!(tracker.toggle("ach-1"), Ok(false));
        assert!(!tracker.is_complete("ach-1"));
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut tracker = GuideTracker::new(flat_achievements());
        assert_eq!(
            tracker.toggle("ach-99"),
            Err(GuideError::UnknownItem("ach-99".to_string()))
        );
    }

    #[test]
    fn test_mutex_group_locks_siblings() {
        let mut tracker = GuideTracker::new(story_guide());
        tracker.toggle("c2-a").expect("pick a path");

        assert!(tracker.is_item_disabled("c2-b"));
        assert!(tracker.is_item_disabled("c2-c"));
        assert_eq!(
            tracker.toggle("c2-b"),
            Err(GuideError::ItemLocked("c2-b".to_string()))
        );

        // Unchecking the chosen path re-enables the rest.
        tracker.toggle("c2-a").expect("uncheck");
        assert!(!tracker.is_item_disabled("c2-b"));
        assert_eq!(tracker.toggle("c2-b"), Ok(true));
    }

    #[test]
    fn test_chapter_gating_and_relock() {
        let mut tracker = GuideTracker::new(story_guide());
        assert!(tracker.is_chapter_unlocked(0));
        assert!(!tracker.is_chapter_unlocked(1));

        tracker.toggle("c1-a").expect("c1-a");
        tracker.toggle("c1-b").expect("c1-b");
        assert!(tracker.is_chapter_unlocked(1));

        tracker.toggle("c2-a").expect("c2-a");
        assert!(tracker.is_chapter_done(1));
        assert_eq!(tracker.current_chapter(), 3);

        // Reversing a chapter-1 prerequisite re-locks chapter 2 even though
        // c2-a stays checked in the map.
        tracker.toggle("c1-b").expect("uncheck c1-b");
        assert!(!tracker.is_chapter_unlocked(1));
        assert!(tracker.is_complete("c2-a"));
        assert_eq!(tracker.current_chapter(), 1);
    }

    #[test]
    fn test_chapter_statuses_snapshot() {
        let mut tracker = GuideTracker::new(story_guide());
        tracker.toggle("c1-a").expect("c1-a");

        let statuses = tracker.chapter_statuses();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].number, 1);
        assert_eq!(statuses[0].title, "Debut");
        assert!(statuses[0].unlocked);
        assert!(!statuses[0].done);
        assert!(!statuses[1].unlocked);
    }

    #[test]
    fn test_achievement_stats_percentage() {
        let mut tracker = GuideTracker::new(flat_achievements());
        assert_eq!(
            tracker.stats(),
            ProgressStats {
                completed: 0,
                total: 3,
                percentage: 0
            }
        );

        tracker.toggle("ach-1").expect("check");
        assert_eq!(
            tracker.stats(),
            ProgressStats {
                completed: 1,
                total: 3,
                percentage: 33
            }
        );

        tracker.toggle("ach-1").expect("uncheck");
        assert_eq!(tracker.stats().completed, 0);
        assert_eq!(tracker.stats().percentage, 0);
    }

    #[test]
    fn test_set_map_replaces_state() {
        let mut tracker = GuideTracker::new(story_guide());
        tracker.toggle("c1-a").expect("check");

        tracker.set_map([("c1-a", true), ("c1-b", true)].into_iter().collect());
        assert!(tracker.is_chapter_done(0));
        assert_eq!(tracker.current_chapter(), 2);
    }

    #[test]
    fn test_flat_guide_has_no_chapters() {
        let tracker = GuideTracker::new(flat_achievements());
        assert!(tracker.chapter_statuses().is_empty());
        assert_eq!(tracker.current_chapter(), 1);
    }
}
