//! Task repository contract and error model.
//!
//! # Responsibility
//! - Define the CRUD surface every task store implementation exposes.
//! - Classify failures into init, not-found and persistence errors.
//!
//! # Invariants
//! - `add` is the only operation that assigns ids.
//! - `list` always runs `cleanup` before taking its snapshot.

use crate::model::task::{TaskId, TaskItem};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for task store initialization, lookup and persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Parent directory of the tasks file could not be created.
    CreateDir { path: PathBuf, source: io::Error },
    /// Tasks file exists but could not be read.
    Read { path: PathBuf, source: io::Error },
    /// Tasks file content is not a valid task array.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize(serde_json::Error),
    Write { path: PathBuf, source: io::Error },
    NotFound(TaskId),
    /// No unused id is left above the highest stored one.
    IdSpaceExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => write!(
                f,
                "failed to create storage directory `{}`: {source}",
                path.display()
            ),
            Self::Read { path, source } => {
                write!(f, "failed to read tasks file `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => write!(
                f,
                "failed to parse tasks file `{}`: {source}",
                path.display()
            ),
            Self::Serialize(err) => write!(f, "failed to serialize tasks: {err}"),
            Self::Write { path, source } => write!(
                f,
                "failed to write tasks file `{}`: {source}",
                path.display()
            ),
            Self::NotFound(id) => write!(f, "task with ID {id} not found"),
            Self::IdSpaceExhausted => write!(f, "no task IDs left to assign"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Write { source, .. } => Some(source),
            Self::NotFound(_) | Self::IdSpaceExhausted => None,
        }
    }
}

/// Repository interface for task CRUD operations.
///
/// Implementations own their storage and must be safe to share across threads.
pub trait TaskRepository {
    /// Assigns the next id, stores the task and persists the collection.
    fn add(&self, task: TaskItem) -> StoreResult<TaskItem>;
    fn get(&self, id: TaskId) -> Option<TaskItem>;
    /// Removes expired tasks, then returns the rest in unspecified order.
    fn list(&self) -> Vec<TaskItem>;
    fn update(&self, task: &TaskItem) -> StoreResult<()>;
    fn delete(&self, id: TaskId) -> StoreResult<()>;
    /// Removes expired tasks and returns how many were removed.
    fn cleanup(&self) -> StoreResult<usize>;
}

impl<T: TaskRepository + ?Sized> TaskRepository for &T {
    fn add(&self, task: TaskItem) -> StoreResult<TaskItem> {
        (**self).add(task)
    }

    fn get(&self, id: TaskId) -> Option<TaskItem> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<TaskItem> {
        (**self).list()
    }

    fn update(&self, task: &TaskItem) -> StoreResult<()> {
        (**self).update(task)
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete(id)
    }

    fn cleanup(&self) -> StoreResult<usize> {
        (**self).cleanup()
    }
}

impl<T: TaskRepository + ?Sized> TaskRepository for Arc<T> {
    fn add(&self, task: TaskItem) -> StoreResult<TaskItem> {
        (**self).add(task)
    }

    fn get(&self, id: TaskId) -> Option<TaskItem> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<TaskItem> {
        (**self).list()
    }

    fn update(&self, task: &TaskItem) -> StoreResult<()> {
        (**self).update(task)
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete(id)
    }

    fn cleanup(&self) -> StoreResult<usize> {
        (**self).cleanup()
    }
}
