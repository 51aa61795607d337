//! Completion statistics derived from task snapshots.
//!
//! # Responsibility
//! - Aggregate overall and per-day completion metrics.
//! - Render completion ratios as fixed-width progress bars.
//!
//! # Invariants
//! - Statistics are always recomputed from a full snapshot, never merged.

pub mod collector;
pub mod progress;
