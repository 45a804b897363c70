//! Task comment repository contract and SQLite implementation.
//!
//! # Invariants
//! - Comments are scoped by project owner (`owner_id`) + project + task.
//! - Lists are ordered newest first.

use crate::model::comment::{normalize_comment_text, CommentId, TaskComment};
use crate::repo::{new_record_id, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Comment author details, stored verbatim alongside the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAuthor<'a> {
    pub user_id: &'a str,
    pub user_name: &'a str,
}

/// Repository interface for task comment operations.
pub trait CommentRepository {
    fn add_comment(
        &self,
        owner_id: &str,
        project_id: &str,
        task_id: &str,
        author: &CommentAuthor<'_>,
        text: &str,
    ) -> RepoResult<CommentId>;
    fn list_comments(
        &self,
        owner_id: &str,
        project_id: &str,
        task_id: &str,
    ) -> RepoResult<Vec<TaskComment>>;
    fn delete_comments_for_task(
        &self,
        owner_id: &str,
        project_id: &str,
        task_id: &str,
    ) -> RepoResult<usize>;
    fn delete_comments_for_project(&self, owner_id: &str, project_id: &str)
        -> RepoResult<usize>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn add_comment(
        &self,
        owner_id: &str,
        project_id: &str,
        task_id: &str,
        author: &CommentAuthor<'_>,
        text: &str,
    ) -> RepoResult<CommentId> {
        let text = normalize_comment_text(text)?;

        let task_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM tasks WHERE user_id = ?1 AND project_id = ?2 AND id = ?3
            );",
            params![owner_id, project_id, task_id],
            |row| row.get(0),
        )?;
        if task_exists == 0 {
            return Err(RepoError::not_found("task", task_id));
        }

        let id = new_record_id();
        self.conn.execute(
            "INSERT INTO task_comments (id, owner_id, project_id, task_id, user_id, user_name, text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                id.as_str(),
                owner_id,
                project_id,
                task_id,
                author.user_id,
                author.user_name,
                text,
            ],
        )?;
        Ok(id)
    }

    fn list_comments(
        &self,
        owner_id: &str,
        project_id: &str,
        task_id: &str,
    ) -> RepoResult<Vec<TaskComment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, task_id, user_id, user_name, text, created_at
             FROM task_comments
             WHERE owner_id = ?1 AND project_id = ?2 AND task_id = ?3
             ORDER BY created_at DESC, rowid DESC;",
        )?;
        let mut rows = stmt.query(params![owner_id, project_id, task_id])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }
        Ok(comments)
    }

    fn delete_comments_for_task(
        &self,
        owner_id: &str,
        project_id: &str,
        task_id: &str,
    ) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM task_comments WHERE owner_id = ?1 AND project_id = ?2 AND task_id = ?3;",
            params![owner_id, project_id, task_id],
        )?;
        Ok(removed)
    }

    fn delete_comments_for_project(
        &self,
        owner_id: &str,
        project_id: &str,
    ) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM task_comments WHERE owner_id = ?1 AND project_id = ?2;",
            params![owner_id, project_id],
        )?;
        Ok(removed)
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<TaskComment> {
    Ok(TaskComment {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        task_id: row.get("task_id")?,
        user_id: row.get("user_id")?,
        user_name: row.get("user_name")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}
