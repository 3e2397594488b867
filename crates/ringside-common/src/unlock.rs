//! Unlock evaluation.
//!
//! Pure functions that derive gating state from a [`CompletionMap`] and a
//! category's static rule table. Nothing here caches or persists: unlock
//! state is recomputed from the current map on every call, so reversing a
//! prerequisite immediately re-locks everything that depended on it.

use crate::completion::CompletionMap;
use crate::rules::ChapterRule;

/// True when every listed item is complete. Vacuously true for an empty
/// list.
#[must_use]
pub fn is_all_of<S: AsRef<str>>(map: &CompletionMap, items: &[S]) -> bool {
    items.iter().all(|id| map.is_complete(id.as_ref()))
}

/// True when at least one listed item is complete. False for an empty list.
#[must_use]
pub fn is_any_of<S: AsRef<str>>(map: &CompletionMap, items: &[S]) -> bool {
    items.iter().any(|id| map.is_complete(id.as_ref()))
}

/// Whether an item's checkbox is currently locked by its mutual-exclusion
/// group.
///
/// A completed item is never disabled (it can always be unchecked again).
/// An incomplete item is disabled while any of its group siblings is
/// complete: pick-one-of-N semantics.
#[must_use]
pub fn is_item_disabled<S: AsRef<str>>(map: &CompletionMap, item_id: &str, group: &[S]) -> bool {
    if map.is_complete(item_id) {
        return false;
    }
    is_any_of(map, group)
}

/// Whether a chapter's completion predicate holds.
#[must_use]
pub fn is_chapter_done(map: &CompletionMap, rule: &ChapterRule) -> bool {
    rule.is_done(map)
}

/// Whether the chapter at `index` (0-based) is unlocked: the first chapter
/// always is, every later one requires the previous chapter to be done.
/// Indexes past the table are locked, except that `rules.len()` reports
/// whether the whole chain has been cleared into the terminal position.
#[must_use]
pub fn is_chapter_unlocked(map: &CompletionMap, rules: &[ChapterRule], index: usize) -> bool {
    if index == 0 {
        return true;
    }
    rules
        .get(index - 1)
        .is_some_and(|previous| previous.is_done(map))
}

/// 1-based index of the first chapter whose predicate is not yet satisfied;
/// `rules.len() + 1` once every chapter is done.
#[must_use]
pub fn current_chapter(map: &CompletionMap, rules: &[ChapterRule]) -> usize {
    rules
        .iter()
        .position(|rule| !rule.is_done(map))
        .map_or(rules.len() + 1, |idx| idx + 1)
}
