//! JSON file backed task store.
//!
//! # Responsibility
//! - Keep the task collection in memory as an id -> task map.
//! - Persist the full collection as a JSON array after every mutation.
//! - Drop end-of-day tasks whose creation day has passed.
//!
//! # Invariants
//! - `next_id` is always greater than every id ever stored or loaded.
//! - Reads take the shared lock, mutations take the exclusive lock.
//! - File writes are serialized and replace the file atomically
//!   (temp file in the same directory, then rename).
//! - Memory may run ahead of disk after a failed write; the next successful
//!   write catches the file up.

use super::task_repo::{StoreError, StoreResult, TaskRepository};
use crate::clock::{Clock, SystemClock};
use crate::model::task::{TaskId, TaskItem};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::fs::{self, Permissions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tempfile::NamedTempFile;

struct StoreState {
    tasks: HashMap<TaskId, TaskItem>,
    next_id: TaskId,
}

/// Task store persisted to a single JSON file.
pub struct JsonTaskStore {
    path: PathBuf,
    state: RwLock<StoreState>,
    persist_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl JsonTaskStore {
    /// Opens the store at `path` using the system clock.
    ///
    /// # Errors
    /// - `StoreError::CreateDir` when the parent directory cannot be created.
    /// - `StoreError::Read` for read failures other than a missing file.
    /// - `StoreError::Parse` when the file is not a valid task array.
    /// - `StoreError::IdSpaceExhausted` when a stored id is `u64::MAX`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    /// Opens the store at `path` with an explicit clock for expiry checks.
    pub fn open_with_clock(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> StoreResult<Self> {
        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();
        info!("event=store_open module=store status=start");

        let dir = parent_dir(&path);
        if let Err(source) = fs::create_dir_all(dir) {
            error!(
                "event=store_open module=store status=error duration_ms={} error_code=create_dir_failed error={}",
                started_at.elapsed().as_millis(),
                source
            );
            return Err(StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            });
        }

        let loaded = match load_tasks(&path) {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(
                    "event=store_open module=store status=error duration_ms={} error_code=load_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        let mut tasks = HashMap::with_capacity(loaded.len());
        let mut next_id: TaskId = 1;
        for task in loaded {
            if task.id >= next_id {
                next_id = match task.id.checked_add(1) {
                    Some(id) => id,
                    None => {
                        error!(
                            "event=store_open module=store status=error duration_ms={} error_code=id_space_exhausted max_id={}",
                            started_at.elapsed().as_millis(),
                            task.id
                        );
                        return Err(StoreError::IdSpaceExhausted);
                    }
                };
            }
            tasks.insert(task.id, task);
        }

        info!(
            "event=store_open module=store status=ok duration_ms={} task_count={} next_id={}",
            started_at.elapsed().as_millis(),
            tasks.len(),
            next_id
        );

        Ok(Self {
            path,
            state: RwLock::new(StoreState { tasks, next_id }),
            persist_lock: Mutex::new(()),
            clock,
        })
    }

    /// Path of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Vec<TaskItem> {
        self.read_state().tasks.values().cloned().collect()
    }

    /// Writes the current collection to disk.
    ///
    /// The snapshot is taken after acquiring the persist lock so the last
    /// finished write always carries the latest in-memory state.
    fn persist(&self) -> StoreResult<()> {
        let _guard = self
            .persist_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let tasks = self.snapshot();
        let data = serde_json::to_vec_pretty(&tasks).map_err(StoreError::Serialize)?;

        match write_atomic(&self.path, &data) {
            Ok(()) => {
                debug!(
                    "event=store_persist module=store status=ok task_count={} bytes={}",
                    tasks.len(),
                    data.len()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=store_persist module=store status=error error_code=write_failed error={}",
                    source
                );
                Err(StoreError::Write {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

impl TaskRepository for JsonTaskStore {
    fn add(&self, mut task: TaskItem) -> StoreResult<TaskItem> {
        {
            let mut state = self.write_state();
            let following = state
                .next_id
                .checked_add(1)
                .ok_or(StoreError::IdSpaceExhausted)?;
            task.id = state.next_id;
            state.next_id = following;
            state.tasks.insert(task.id, task.clone());
        }
        info!("event=task_add module=store status=ok id={}", task.id);

        self.persist()?;
        Ok(task)
    }

    fn get(&self, id: TaskId) -> Option<TaskItem> {
        self.read_state().tasks.get(&id).cloned()
    }

    fn list(&self) -> Vec<TaskItem> {
        if let Err(err) = self.cleanup() {
            warn!(
                "event=task_list module=store status=error error_code=cleanup_failed error={}",
                err
            );
        }
        self.snapshot()
    }

    fn update(&self, task: &TaskItem) -> StoreResult<()> {
        {
            let mut state = self.write_state();
            match state.tasks.get_mut(&task.id) {
                Some(stored) => *stored = task.clone(),
                None => return Err(StoreError::NotFound(task.id)),
            }
        }
        info!("event=task_update module=store status=ok id={}", task.id);

        self.persist()
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        if self.write_state().tasks.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        info!("event=task_delete module=store status=ok id={}", id);

        self.persist()
    }

    fn cleanup(&self) -> StoreResult<usize> {
        let today = self.clock.today();
        let expired: Vec<TaskId> = self
            .read_state()
            .tasks
            .values()
            .filter(|task| task.is_expired_on(today))
            .map(|task| task.id)
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        let removed = {
            let mut state = self.write_state();
            let mut removed = 0;
            for id in expired {
                // A concurrent update may have replaced the task since the scan.
                if state
                    .tasks
                    .get(&id)
                    .is_some_and(|task| task.is_expired_on(today))
                {
                    state.tasks.remove(&id);
                    removed += 1;
                }
            }
            removed
        };

        if removed == 0 {
            return Ok(0);
        }
        info!(
            "event=task_cleanup module=store status=ok removed={} today={}",
            removed, today
        );

        self.persist()?;
        Ok(removed)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn load_tasks(path: &Path) -> StoreResult<Vec<TaskItem>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces `path` with `data` through a temp file in the same directory.
///
/// The replacement keeps the mode of the file it replaces; a new file gets
/// the platform default for user data files.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = NamedTempFile::new_in(parent_dir(path))?;
    file.write_all(data)?;
    if let Some(permissions) = target_permissions(path) {
        file.as_file().set_permissions(permissions)?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn target_permissions(path: &Path) -> Option<Permissions> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Some(metadata.permissions()),
        _ => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
