//! Display-facing derivations the presentation layer renders directly.
//!
//! # Responsibility
//! - Overdue detection and relative due-date labels.
//! - Empty-list messaging.
//!
//! # Invariants
//! - Every helper takes `today` explicitly; nothing here reads a clock.

use crate::model::task::Task;
use chrono::{Days, NaiveDate};
use std::fmt::{Display, Formatter};

/// A pending task whose due date lies strictly before `today`.
///
/// Completed tasks are never overdue.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed && task.due_date.is_some_and(|due| due < today)
}

/// Relative rendering of a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    Today,
    Tomorrow,
    On(NaiveDate),
}

impl Display for DueLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Today => f.write_str("Today"),
            Self::Tomorrow => f.write_str("Tomorrow"),
            Self::On(date) => write!(f, "{}", date.format("%b %-d")),
        }
    }
}

pub fn due_label(due: NaiveDate, today: NaiveDate) -> DueLabel {
    if due == today {
        DueLabel::Today
    } else if today.checked_add_days(Days::new(1)) == Some(due) {
        DueLabel::Tomorrow
    } else {
        DueLabel::On(due)
    }
}

/// Why the derived list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The collection itself is empty.
    NoTasks,
    /// Tasks exist but the current filters hide all of them.
    NoMatches,
}

impl EmptyState {
    pub fn title(self) -> &'static str {
        match self {
            Self::NoTasks => "No tasks yet",
            Self::NoMatches => "No matching tasks",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::NoTasks => "Add your first task to get started!",
            Self::NoMatches => "Try adjusting your filters",
        }
    }
}

/// `None` while at least one task is visible.
pub fn empty_state(total: usize, visible: usize) -> Option<EmptyState> {
    match (total, visible) {
        (_, v) if v > 0 => None,
        (0, _) => Some(EmptyState::NoTasks),
        _ => Some(EmptyState::NoMatches),
    }
}
