//! Task use-case service.
//!
//! # Responsibility
//! - Provide the entry points command handlers call (add, complete, delete, stats).
//! - Validate input before it reaches the store.
//! - Apply batch deletes item by item, collecting per-id failures.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - A failing id in a batch never prevents the remaining ids from being processed.

use crate::clock::{Clock, SystemClock};
use crate::model::task::{Priority, TaskId, TaskItem, TaskValidationError};
use crate::repo::task_repo::{StoreError, TaskRepository};
use crate::stats::collector::StatsCollector;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(TaskValidationError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Request model for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTaskRequest {
    pub title: String,
    pub notes: String,
    pub priority: Priority,
    /// Keep the task past the end of its creation day.
    pub keep: bool,
}

/// Result of deleting several tasks in one call.
#[derive(Debug, Default)]
pub struct BatchDeleteOutcome {
    /// Ids removed successfully, in request order.
    pub deleted: Vec<TaskId>,
    /// Ids that could not be removed, with the reason.
    pub failed: Vec<(TaskId, StoreError)>,
}

impl BatchDeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Use-case service wrapper over a task repository.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    clock: Arc<dyn Clock>,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service stamping new tasks with the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, Arc::new(SystemClock))
    }

    pub fn with_clock(repo: R, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validates and stores a new task, returning it with its assigned id.
    pub fn add_task(&self, request: NewTaskRequest) -> ServiceResult<TaskItem> {
        let mut task = TaskItem::new(request.title, self.clock.now())?
            .with_notes(request.notes)
            .with_priority(request.priority);
        if request.keep {
            task = task.keep();
        }
        Ok(self.repo.add(task)?)
    }

    pub fn get_task(&self, id: TaskId) -> Option<TaskItem> {
        self.repo.get(id)
    }

    /// Lists live tasks sorted by id.
    pub fn list_tasks(&self) -> Vec<TaskItem> {
        let mut tasks = self.repo.list();
        tasks.sort_by_key(|task| task.id);
        tasks
    }

    /// Marks one task completed.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when `id` does not exist.
    pub fn complete_task(&self, id: TaskId) -> ServiceResult<TaskItem> {
        let mut task = self.repo.get(id).ok_or(StoreError::NotFound(id))?;
        task.completed = true;
        self.repo.update(&task)?;
        Ok(task)
    }

    pub fn delete_task(&self, id: TaskId) -> ServiceResult<()> {
        Ok(self.repo.delete(id)?)
    }

    /// Deletes every id in `ids`, continuing past failures.
    pub fn delete_tasks(&self, ids: &[TaskId]) -> BatchDeleteOutcome {
        let mut outcome = BatchDeleteOutcome::default();
        for &id in ids {
            match self.repo.delete(id) {
                Ok(()) => outcome.deleted.push(id),
                Err(err) => outcome.failed.push((id, err)),
            }
        }
        outcome
    }

    /// Computes statistics over the current live tasks.
    pub fn stats(&self) -> StatsCollector {
        let mut collector = StatsCollector::new();
        collector.update_stats(&self.repo.list());
        collector
    }
}
