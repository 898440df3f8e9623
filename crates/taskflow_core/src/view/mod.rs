//! Pure derivations over the task collection.
//!
//! # Responsibility
//! - Derive the displayed list from tasks plus filter state.
//! - Aggregate completion statistics.
//! - Provide small display helpers (overdue, due labels, empty state).
//!
//! # Invariants
//! - Nothing in this module mutates or persists tasks.

pub mod pipeline;
pub mod presentation;
pub mod stats;
