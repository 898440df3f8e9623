//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate in-memory mutations and persistence into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod task_store;
