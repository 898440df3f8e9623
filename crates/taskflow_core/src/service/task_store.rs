//! Task store use-case service.
//!
//! # Responsibility
//! - Own the authoritative in-memory task collection for one session.
//! - Provide create/update/toggle/delete/clear entry points.
//! - Persist the full collection after every successful mutation.
//!
//! # Invariants
//! - Collection order is newest-first; `add` inserts at index 0.
//! - Each successful mutation triggers exactly one `save`, after the
//!   in-memory change. Failed operations never save.
//! - A failed operation leaves the collection untouched.

use crate::model::task::{normalize_text, Category, Priority, Task, TaskId};
use crate::repo::task_persistence::TaskPersistence;
use chrono::NaiveDate;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Recoverable failures reported to callers of `TaskStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStoreError {
    /// Task text is blank after trim.
    EmptyText,
    /// No task with this id exists (already deleted, or never existed).
    NotFound(TaskId),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be blank"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for TaskStoreError {}

/// Editable task fields, as submitted by an add or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Raw text; trimmed by the store.
    pub text: String,
    pub category: Option<Category>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Draft with only text set and default metadata (`low`, no category,
    /// no due date).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Session-scoped owner of the task collection.
pub struct TaskStore<P: TaskPersistence> {
    tasks: Vec<Task>,
    persistence: P,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Starts a session from whatever the persistence layer holds.
    pub fn open(persistence: P) -> Self {
        let tasks = persistence.load();
        info!(
            "event=store_open module=store status=ok count={}",
            tasks.len()
        );
        Self { tasks, persistence }
    }

    /// Creates a task at the front of the collection.
    ///
    /// # Errors
    /// - `EmptyText` when the trimmed text is empty; nothing is saved.
    pub fn add(&mut self, draft: TaskDraft) -> TaskStoreResult<Task> {
        let task = Task::new(&draft.text, draft.category, draft.priority, draft.due_date)
            .map_err(|_| reject_blank("add"))?;

        self.tasks.insert(0, task.clone());
        self.persist();
        info!(
            "event=task_add module=store status=ok task_id={} total={}",
            task.id,
            self.tasks.len()
        );
        Ok(task)
    }

    /// Replaces the four editable fields of an existing task.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `EmptyText` when the trimmed text is empty.
    pub fn update(&mut self, id: &TaskId, draft: TaskDraft) -> TaskStoreResult<Task> {
        let index = self.position(id)?;
        let text = normalize_text(&draft.text).map_err(|_| reject_blank("update"))?;

        let task = &mut self.tasks[index];
        task.text = text;
        task.category = draft.category;
        task.priority = draft.priority;
        task.due_date = draft.due_date;
        let updated = task.clone();

        self.persist();
        info!("event=task_update module=store status=ok task_id={id}");
        Ok(updated)
    }

    /// Flips the completion flag.
    pub fn toggle_completed(&mut self, id: &TaskId) -> TaskStoreResult<Task> {
        let index = self.position(id)?;
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let toggled = task.clone();

        self.persist();
        info!(
            "event=task_toggle module=store status=ok task_id={} completed={}",
            id, toggled.completed
        );
        Ok(toggled)
    }

    /// Removes one task immediately.
    pub fn delete(&mut self, id: &TaskId) -> TaskStoreResult<()> {
        let index = self.position(id)?;
        self.tasks.remove(index);

        self.persist();
        info!(
            "event=task_delete module=store status=ok task_id={} total={}",
            id,
            self.tasks.len()
        );
        Ok(())
    }

    /// Removes every completed task and returns how many were removed.
    ///
    /// Saves only when something was removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();

        if removed > 0 {
            self.persist();
        }
        info!(
            "event=tasks_clear_completed module=store status=ok removed={} total={}",
            removed,
            self.tasks.len()
        );
        removed
    }

    /// Read-only view of the collection in newest-first order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up one task, e.g. to prefill an edit form.
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Whether any task is completed (drives the clear-completed action).
    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|task| task.completed)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    fn position(&self, id: &TaskId) -> TaskStoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| &task.id == id)
            .ok_or_else(|| {
                debug!("event=task_lookup module=store status=error error_code=not_found task_id={id}");
                TaskStoreError::NotFound(id.clone())
            })
    }

    fn persist(&mut self) {
        self.persistence.save(&self.tasks);
    }
}

fn reject_blank(operation: &str) -> TaskStoreError {
    debug!("event=task_{operation} module=store status=error error_code=empty_text");
    TaskStoreError::EmptyText
}
