//! Derived-view pipeline: filter, search, then sort.
//!
//! # Invariants
//! - The source collection is never mutated or reordered.
//! - All sorts are stable; ties keep their filtered relative order.

use crate::model::task::{Category, Priority, Task, UnknownValueError};
use std::cmp::Ordering;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Completion-status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    fn keeps(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownValueError::new("status filter", other)),
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Collection order (newest first).
    #[default]
    Created,
    /// Earliest due date first; undated tasks last.
    DueDate,
    /// High, then medium, then low.
    Priority,
    /// Alphabetical by text.
    Name,
}

impl FromStr for SortKey {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "created" => Ok(Self::Created),
            "dueDate" | "due_date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "name" => Ok(Self::Name),
            other => Err(UnknownValueError::new("sort key", other)),
        }
    }
}

/// Everything the presentation layer can narrow or reorder the list by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub status: StatusFilter,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    /// Raw search input; trimmed and lowercased before matching.
    pub search_term: String,
    pub sort_key: SortKey,
}

/// Derives the displayed list from the full collection.
///
/// Stages run in a fixed order: status, category, priority, search, sort.
pub fn derive_view(tasks: &[Task], filter: &FilterState) -> Vec<Task> {
    let needle = filter.search_term.trim().to_lowercase();

    let mut view = tasks
        .iter()
        .filter(|task| filter.status.keeps(task))
        .filter(|task| filter.category.map_or(true, |c| task.category == Some(c)))
        .filter(|task| filter.priority.map_or(true, |p| task.priority == p))
        .filter(|task| needle.is_empty() || matches_search(task, &needle))
        .cloned()
        .collect::<Vec<_>>();

    sort_view(&mut view, filter.sort_key);
    view
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.text.to_lowercase().contains(needle)
        || task
            .category
            .is_some_and(|category| category.as_str().contains(needle))
}

fn sort_view(view: &mut [Task], key: SortKey) {
    match key {
        SortKey::Created => {}
        SortKey::DueDate => view.sort_by(compare_due_dates),
        SortKey::Priority => view.sort_by_key(|task| task.priority),
        SortKey::Name => view.sort_by_cached_key(|task| CollationKey::new(&task.text)),
    }
}

fn compare_due_dates(a: &Task, b: &Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Multi-level sort key for task text.
///
/// Levels, compared in order: base letters (accents and case folded away),
/// accents, case (lowercase first), then the exact text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    base: Vec<char>,
    accents: Vec<char>,
    case: Vec<bool>,
    exact: String,
}

impl CollationKey {
    fn new(text: &str) -> Self {
        let decomposed = text.nfd().collect::<Vec<_>>();
        let base = decomposed
            .iter()
            .copied()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect();
        let accents = decomposed.iter().copied().flat_map(char::to_lowercase).collect();
        let case = decomposed
            .iter()
            .filter(|c| !is_combining_mark(**c))
            .map(|c| c.is_uppercase())
            .collect();

        Self {
            base,
            accents,
            case,
            exact: text.to_string(),
        }
    }
}
