//! Task persistence layer.
//!
//! # Responsibility
//! - Define the task CRUD contract used by services.
//! - Keep JSON file details inside the core persistence boundary.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   I/O and serialization errors.

pub mod json_store;
pub mod task_repo;
