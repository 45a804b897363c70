//! Task/project access layer.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per record type.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Every query is scoped by owner `user_id`; tasks additionally by project.
//! - Writes enforce structural validation before touching SQL.
//! - Timestamps are assigned by the store, never by callers.
//! - No caching: every call reads or writes the store directly.

use crate::db::DbError;
use crate::model::comment::CommentValidationError;
use crate::model::project::ProjectValidationError;
use crate::model::task::TaskValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod comment_repo;
pub mod project_repo;
pub mod task_repo;

/// SQL expression yielding the current time in epoch milliseconds.
pub(crate) const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Input validation failure surfaced by write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Project(ProjectValidationError),
    Task(TaskValidationError),
    Comment(CommentValidationError),
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Project(err) => err.field(),
            Self::Task(err) => err.field(),
            Self::Comment(_) => "text",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project(err) => write!(f, "{err}"),
            Self::Task(err) => write!(f, "{err}"),
            Self::Comment(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Project(err) => Some(err),
            Self::Task(err) => Some(err),
            Self::Comment(err) => Some(err),
        }
    }
}

/// Generic repository error for store operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    /// Store transport failure; callers treat this as "unavailable".
    Db(DbError),
    NotFound { entity: &'static str, id: String },
    /// Persisted row cannot be decoded into the domain model.
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "task store unavailable: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(ValidationError::Project(value))
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(ValidationError::Task(value))
    }
}

impl From<CommentValidationError> for RepoError {
    fn from(value: CommentValidationError) -> Self {
        Self::Validation(ValidationError::Comment(value))
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
