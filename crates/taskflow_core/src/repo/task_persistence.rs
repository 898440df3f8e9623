//! Task collection persistence over a named slot.
//!
//! # Responsibility
//! - Encode the full task collection as one JSON array and write it to a slot.
//! - Decode the slot back into tasks at session start.
//!
//! # Invariants
//! - `load` never fails: absent, unreadable or malformed slots yield an
//!   empty collection.
//! - `save` never fails: storage errors are logged and dropped.
//! - Decoded collections satisfy `Task::validate()` and id uniqueness, or
//!   are rejected as a whole.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::kv_store::KeyValueStore;
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot name used by the original browser client.
pub const DEFAULT_SLOT_KEY: &str = "taskflow-tasks";

/// Best-effort persistence contract consumed by `TaskStore`.
pub trait TaskPersistence {
    /// Returns the persisted collection, or an empty one on any failure.
    fn load(&self) -> Vec<Task>;
    /// Writes the full collection. Failures are swallowed.
    fn save(&mut self, tasks: &[Task]);
}

/// Reasons a slot payload cannot be turned into a task collection.
#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    InvalidTask {
        index: usize,
        reason: TaskValidationError,
    },
    DuplicateId(TaskId),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed task payload: {err}"),
            Self::InvalidTask { index, reason } => {
                write!(f, "invalid task at index {index}: {reason}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate task id `{id}`"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidTask { reason, .. } => Some(reason),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes tasks to the slot's JSON array form, preserving order.
pub fn encode_tasks(tasks: &[Task]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(tasks)
}

/// Parses a slot payload and checks collection invariants.
///
/// Task text is trimmed on the way in.
pub fn decode_tasks(bytes: &[u8]) -> Result<Vec<Task>, DecodeError> {
    let mut tasks: Vec<Task> = serde_json::from_slice(bytes)?;
    for task in &mut tasks {
        let trimmed = task.text.trim();
        if trimmed.len() != task.text.len() {
            task.text = trimmed.to_string();
        }
    }

    let mut seen = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        task.validate()
            .map_err(|reason| DecodeError::InvalidTask { index, reason })?;
        if !seen.insert(&task.id) {
            return Err(DecodeError::DuplicateId(task.id.clone()));
        }
    }

    Ok(tasks)
}

/// `TaskPersistence` backed by one slot of a `KeyValueStore`.
pub struct SlotPersistence<S: KeyValueStore> {
    store: S,
    slot_key: String,
}

impl<S: KeyValueStore> SlotPersistence<S> {
    pub fn new(store: S, slot_key: impl Into<String>) -> Self {
        Self {
            store,
            slot_key: slot_key.into(),
        }
    }

    /// Uses the default `taskflow-tasks` slot.
    pub fn with_default_slot(store: S) -> Self {
        Self::new(store, DEFAULT_SLOT_KEY)
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: KeyValueStore> TaskPersistence for SlotPersistence<S> {
    fn load(&self) -> Vec<Task> {
        let bytes = match self.store.read(&self.slot_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!(
                    "event=tasks_load module=persistence status=ok slot={} count=0 reason=absent",
                    self.slot_key
                );
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=persistence status=error slot={} error_code=slot_read_failed error={}",
                    self.slot_key, err
                );
                return Vec::new();
            }
        };

        match decode_tasks(&bytes) {
            Ok(tasks) => {
                info!(
                    "event=tasks_load module=persistence status=ok slot={} count={}",
                    self.slot_key,
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=persistence status=error slot={} bytes={} error_code=slot_decode_failed error={}",
                    self.slot_key,
                    bytes.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, tasks: &[Task]) {
        let bytes = match encode_tasks(tasks) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(
                    "event=tasks_save module=persistence status=error slot={} error_code=encode_failed error={}",
                    self.slot_key, err
                );
                return;
            }
        };

        match self.store.write(&self.slot_key, &bytes) {
            Ok(()) => info!(
                "event=tasks_save module=persistence status=ok slot={} count={} bytes={}",
                self.slot_key,
                tasks.len(),
                bytes.len()
            ),
            Err(err) => error!(
                "event=tasks_save module=persistence status=error slot={} error_code=slot_write_failed error={}",
                self.slot_key, err
            ),
        }
    }
}
