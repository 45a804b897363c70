//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Run form validation before any store call.
//! - Keep callers decoupled from storage details; every call takes the
//!   caller's `UserContext` explicitly.

use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use crate::repo::{RepoError, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment_service;
pub mod dashboard_service;
pub mod notification_service;
pub mod project_service;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to presentation code.
#[derive(Debug)]
pub enum ServiceError {
    /// Inline form error; nothing was written.
    Validation(ValidationError),
    ProjectNotFound(ProjectId),
    TaskNotFound(TaskId),
    /// Store failure; shown as a transient error toast.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the record.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound {
                entity: "project",
                id,
            } => Self::ProjectNotFound(id),
            RepoError::NotFound { entity: "task", id } => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl ServiceError {
    /// Stable code used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::TaskNotFound(_) => "task_not_found",
            Self::Repo(_) => "store_unavailable",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}
