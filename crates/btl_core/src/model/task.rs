//! Task item domain model.
//!
//! # Responsibility
//! - Define the record persisted in the tasks JSON file.
//! - Provide the end-of-day expiry predicate.
//!
//! # Invariants
//! - `id == 0` means "not yet assigned"; the store assigns ids starting at 1.
//! - `title` is never empty for items created through `TaskItem::new`.
//! - `time_created` is set once and never changes.
//! - Priority is encoded on the wire as `0=High, 1=Medium, 2=Low`.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned task identifier.
pub type TaskId = u64;

/// Task urgency with a fixed display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Display label (`High`, `Medium`, `Low`).
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parses a case-insensitive label such as `high`.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        match value {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::High),
            1 => Ok(Self::Medium),
            2 => Ok(Self::Low),
            other => Err(format!("invalid priority code {other}; expected 0, 1 or 2")),
        }
    }
}

/// Validation errors for task construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One todo entry as persisted in the tasks file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: TaskId,
    pub title: String,
    pub priority: Priority,
    pub notes: String,
    pub completed: bool,
    /// When set, the task is removed once its creation day has passed.
    pub delete_by_eod: bool,
    pub time_created: DateTime<Local>,
}

impl TaskItem {
    /// Creates an unassigned task with default attributes.
    ///
    /// # Invariants
    /// - `id` starts at `0` until the store assigns one.
    /// - Priority defaults to `Medium`, `delete_by_eod` to `true`.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyTitle` when `title` is blank.
    pub fn new(
        title: impl Into<String>,
        time_created: DateTime<Local>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: 0,
            title: title.into(),
            priority: Priority::default(),
            notes: String::new(),
            completed: false,
            delete_by_eod: true,
            time_created,
        };
        task.validate()?;
        Ok(task)
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Opts the task out of end-of-day cleanup.
    pub fn keep(mut self) -> Self {
        self.delete_by_eod = false;
        self
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Calendar day (local time) the task was created on.
    pub fn created_on(&self) -> NaiveDate {
        self.time_created.date_naive()
    }

    /// Returns whether the task is past its end-of-day deadline on `today`.
    ///
    /// Only the calendar day is compared, not the exact time.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.delete_by_eod && self.created_on() != today
    }

    /// `is_expired_on` evaluated against the local wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_on(Local::now().date_naive())
    }
}
