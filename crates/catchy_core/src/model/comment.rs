//! Task discussion comments.

use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CommentId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    pub id: CommentId,
    pub project_id: ProjectId,
    pub task_id: TaskId,
    /// Author.
    pub user_id: UserId,
    pub user_name: String,
    pub text: String,
    /// Epoch milliseconds, store-assigned.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyText,
}

impl Display for CommentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "comment text must not be blank"),
        }
    }
}

impl Error for CommentValidationError {}

/// Trims comment input, rejecting blank text.
pub fn normalize_comment_text(text: &str) -> Result<String, CommentValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CommentValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}
