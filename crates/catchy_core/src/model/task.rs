//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, its status/priority enums and form shapes.
//! - Validate task form input before any store call.
//!
//! # Invariants
//! - Status alone decides the board column; exactly one of three values.
//! - `title` is non-blank and at least `MIN_TITLE_CHARS` characters.
//! - `project_id` is a back-reference; the store scopes tasks by it.

use crate::model::due_date::DueDate;
use crate::model::project::ProjectId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Task identifier, unique within a project.
pub type TaskId = String;

/// Minimum task title length after trimming.
pub const MIN_TITLE_CHARS: usize = 3;

/// Task lifecycle state. Each value maps to one board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "inProgress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire/storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "inProgress" | "in_progress" | "inprogress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Column heading used by board and list views.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Next status for the quick toggle (`todo -> inProgress -> done -> todo`).
    pub fn next(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Todo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: DueDate,
    /// Epoch milliseconds, store-assigned.
    pub created_at: i64,
    /// Epoch milliseconds, store-assigned.
    pub updated_at: i64,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Create-form input for a task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: DueDate,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)?;
        validate_due_date(&self.due_date)
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DueDate>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(due) = &self.due_date {
            validate_due_date(due)?;
        }
        Ok(())
    }
}

/// Inline form errors for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    TitleRequired,
    TitleTooShort { min: usize },
    InvalidDueDate(String),
}

impl TaskValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::TitleRequired | Self::TitleTooShort { .. } => "title",
            Self::InvalidDueDate(_) => "due_date",
        }
    }
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "Task title is required"),
            Self::TitleTooShort { min } => write!(f, "Task title must be at least {min} characters"),
            Self::InvalidDueDate(raw) => write!(f, "invalid due date `{raw}`"),
        }
    }
}

impl Error for TaskValidationError {}

fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::TitleRequired);
    }
    if trimmed.chars().count() < MIN_TITLE_CHARS {
        return Err(TaskValidationError::TitleTooShort {
            min: MIN_TITLE_CHARS,
        });
    }
    Ok(())
}

fn validate_due_date(due: &DueDate) -> Result<(), TaskValidationError> {
    match due {
        DueDate::Unparsed(raw) => Err(TaskValidationError::InvalidDueDate(raw.clone())),
        DueDate::None | DueDate::On(_) => Ok(()),
    }
}
