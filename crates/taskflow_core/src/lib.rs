//! Core domain logic for TaskFlow.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{ConfigError, TaskflowConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::task::{Category, Priority, Task, TaskId, TaskValidationError, UnknownValueError};
pub use repo::kv_store::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use repo::task_persistence::{
    decode_tasks, encode_tasks, DecodeError, SlotPersistence, TaskPersistence, DEFAULT_SLOT_KEY,
};
pub use service::task_store::{TaskDraft, TaskStore, TaskStoreError, TaskStoreResult};
pub use view::pipeline::{derive_view, FilterState, SortKey, StatusFilter};
pub use view::presentation::{due_label, empty_state, is_overdue, DueLabel, EmptyState};
pub use view::stats::{compute_stats, TaskStats};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
