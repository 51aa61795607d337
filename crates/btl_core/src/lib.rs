//! Core logic for btl, the boring todo list.
//! Owns the task store, end-of-day expiry and completion statistics.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TrackerConfig;
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::task::{Priority, TaskId, TaskItem, TaskValidationError};
pub use repo::json_store::JsonTaskStore;
pub use repo::task_repo::{StoreError, StoreResult, TaskRepository};
pub use service::task_service::{
    BatchDeleteOutcome, NewTaskRequest, ServiceError, ServiceResult, TaskService,
};
pub use stats::collector::{DailyStats, OverallStats, StatsCollector};
pub use stats::progress::render_progress_bar;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
