//! Project domain model.
//!
//! # Responsibility
//! - Define the project record and its create/patch request shapes.
//! - Validate form input before any store call.
//!
//! # Invariants
//! - `name` is non-blank and at least `MIN_NAME_CHARS` characters.
//! - A newly chosen due date is never before the creation day.
//! - `created_at`/`updated_at` are assigned by the store.

use crate::model::due_date::DueDate;
use crate::model::user::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Project identifier, unique per user.
pub type ProjectId = String;

/// Minimum project name length after trimming.
pub const MIN_NAME_CHARS: usize = 3;

/// Fixed color palette used to tag projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectColor {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Pink,
    Red,
    Yellow,
    Indigo,
}

impl ProjectColor {
    pub const ALL: [ProjectColor; 8] = [
        ProjectColor::Blue,
        ProjectColor::Purple,
        ProjectColor::Green,
        ProjectColor::Orange,
        ProjectColor::Pink,
        ProjectColor::Red,
        ProjectColor::Yellow,
        ProjectColor::Indigo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Indigo => "indigo",
        }
    }

    /// Accepts palette names and the `bg-<name>-500` class form.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let name = normalized
            .strip_prefix("bg-")
            .and_then(|rest| rest.strip_suffix("-500"))
            .unwrap_or(normalized.as_str());
        Self::ALL.into_iter().find(|color| color.as_str() == name)
    }
}

/// Persisted project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Owning user.
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub color: ProjectColor,
    pub due_date: DueDate,
    /// Epoch milliseconds, store-assigned.
    pub created_at: i64,
    /// Epoch milliseconds, store-assigned.
    pub updated_at: i64,
}

/// Create-form input for a project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub color: ProjectColor,
    pub due_date: DueDate,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validates the form against `today`.
    ///
    /// # Errors
    /// - Name is blank or shorter than `MIN_NAME_CHARS`.
    /// - Due date is unparseable or before `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ProjectValidationError> {
        self.validate_fields()?;
        match self.due_date {
            DueDate::On(date) if date < today => Err(ProjectValidationError::DueDateInPast(date)),
            _ => Ok(()),
        }
    }

    /// Clock-independent checks enforced again at the store boundary.
    pub fn validate_fields(&self) -> Result<(), ProjectValidationError> {
        validate_name(&self.name)?;
        reject_unparsed(&self.due_date)
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<ProjectColor>,
    pub due_date: Option<DueDate>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.due_date.is_none()
    }

    /// Validates only the fields being changed.
    ///
    /// Editing keeps an already-past due date legal; only unparseable dates
    /// are rejected here.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        match &self.due_date {
            Some(due) => reject_unparsed(due),
            None => Ok(()),
        }
    }
}

/// Inline form errors for project input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    NameRequired,
    NameTooShort { min: usize },
    InvalidDueDate(String),
    DueDateInPast(NaiveDate),
}

impl ProjectValidationError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired | Self::NameTooShort { .. } => "name",
            Self::InvalidDueDate(_) | Self::DueDateInPast(_) => "due_date",
        }
    }
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "Project name is required"),
            Self::NameTooShort { min } => {
                write!(f, "Project name must be at least {min} characters")
            }
            Self::InvalidDueDate(raw) => write!(f, "invalid due date `{raw}`"),
            Self::DueDateInPast(_) => write!(f, "Due date cannot be in the past"),
        }
    }
}

impl Error for ProjectValidationError {}

fn validate_name(name: &str) -> Result<(), ProjectValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ProjectValidationError::NameRequired);
    }
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err(ProjectValidationError::NameTooShort {
            min: MIN_NAME_CHARS,
        });
    }
    Ok(())
}

fn reject_unparsed(due: &DueDate) -> Result<(), ProjectValidationError> {
    match due {
        DueDate::Unparsed(raw) => Err(ProjectValidationError::InvalidDueDate(raw.clone())),
        DueDate::None | DueDate::On(_) => Ok(()),
    }
}
