//! Domain model for tracked tasks.
//!
//! # Responsibility
//! - Define the task record shared by the store, stats and CLI layers.
//!
//! # Invariants
//! - Every stored task is identified by a unique, never reused `TaskId`.
//! - Deletion is a hard delete; no tombstones are kept.

pub mod task;
