//! Storage abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the byte-level slot store contract and its backends.
//! - Map the task collection onto one slot with fail-soft semantics.
//!
//! # Invariants
//! - Storage and decode failures never reach `TaskStore` callers.

pub mod kv_store;
pub mod task_persistence;
