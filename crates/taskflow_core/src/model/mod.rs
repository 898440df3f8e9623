//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its enumerated metadata.
//! - Keep wire naming for the persisted slot next to the types.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Task text is never blank once a task exists.

pub mod task;
