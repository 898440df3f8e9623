//! Completion statistics over the full collection.

use crate::model::task::Task;
use serde::Serialize;

/// Counters shown next to the list and the progress bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// `0..=100`, rounded half up. `0` for an empty collection.
    pub percentage: u8,
}

pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();

    TaskStats {
        total,
        completed,
        pending: total - completed,
        percentage: completion_percentage(completed, total),
    }
}

fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // round(100 * c / t) in integers: floor((200c + t) / 2t)
    let rounded = (200 * completed + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}
