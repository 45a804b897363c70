//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `tasks`, scoped under one user's project.
//!
//! # Invariants
//! - Every statement filters on both `user_id` and `project_id`.
//! - Creating a task under a project the user does not own is `NotFound`.
//! - Lists are ordered newest first (`created_at DESC`).
//! - `get_task`/`list_tasks` reject unknown status/priority values.
//! - `list_decodable_tasks` logs and skips such rows so one bad row never
//!   hides the rest of its project.

use crate::model::due_date::DueDate;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus};
use crate::repo::{new_record_id, RepoError, RepoResult, NOW_MS_SQL};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    project_id,
    user_id,
    title,
    description,
    status,
    priority,
    due_date,
    created_at,
    updated_at
FROM tasks";

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, user_id: &str, project_id: &str, task: &NewTask) -> RepoResult<TaskId>;
    fn list_tasks(&self, user_id: &str, project_id: &str) -> RepoResult<Vec<Task>>;
    /// Lists the tasks that decode cleanly, skipping rows with invalid data.
    ///
    /// Store failures still propagate.
    fn list_decodable_tasks(&self, user_id: &str, project_id: &str) -> RepoResult<Vec<Task>> {
        self.list_tasks(user_id, project_id)
    }
    fn get_task(&self, user_id: &str, project_id: &str, task_id: &str)
        -> RepoResult<Option<Task>>;
    fn update_task(
        &self,
        user_id: &str,
        project_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> RepoResult<()>;
    fn delete_task(&self, user_id: &str, project_id: &str, task_id: &str) -> RepoResult<()>;
    /// Removes every task of a project; returns the number of rows removed.
    fn delete_tasks_for_project(&self, user_id: &str, project_id: &str) -> RepoResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_project_owned(&self, user_id: &str, project_id: &str) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE user_id = ?1 AND id = ?2);",
            params![user_id, project_id],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::not_found("project", project_id));
        }
        Ok(())
    }

    fn scan_tasks(
        &self,
        user_id: &str,
        project_id: &str,
        skip_invalid: bool,
    ) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE user_id = ?1 AND project_id = ?2
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query(params![user_id, project_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            match parse_task_row(row) {
                Ok(task) => tasks.push(task),
                Err(RepoError::InvalidData(reason)) if skip_invalid => {
                    let task_id: String = row.get("id")?;
                    warn!(
                        "event=task_decode module=repo status=error project_id={project_id} task_id={task_id} reason={reason}"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, user_id: &str, project_id: &str, task: &NewTask) -> RepoResult<TaskId> {
        task.validate()?;
        self.ensure_project_owned(user_id, project_id)?;

        let id = new_record_id();
        self.conn.execute(
            "INSERT INTO tasks (
                id,
                project_id,
                user_id,
                title,
                description,
                status,
                priority,
                due_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                id.as_str(),
                project_id,
                user_id,
                task.title.trim(),
                task.description.as_str(),
                task.status.as_str(),
                task.priority.as_str(),
                task.due_date.to_db(),
            ],
        )?;

        Ok(id)
    }

    fn list_tasks(&self, user_id: &str, project_id: &str) -> RepoResult<Vec<Task>> {
        self.scan_tasks(user_id, project_id, false)
    }

    fn list_decodable_tasks(&self, user_id: &str, project_id: &str) -> RepoResult<Vec<Task>> {
        self.scan_tasks(user_id, project_id, true)
    }

    fn get_task(
        &self,
        user_id: &str,
        project_id: &str,
        task_id: &str,
    ) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE user_id = ?1 AND project_id = ?2 AND id = ?3;"
        ))?;
        let mut rows = stmt.query(params![user_id, project_id, task_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn update_task(
        &self,
        user_id: &str,
        project_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> RepoResult<()> {
        patch.validate()?;

        let mut assignments = vec![format!("updated_at = {NOW_MS_SQL}")];
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = &patch.title {
            assignments.push("title = ?".to_string());
            bind_values.push(Value::Text(title.trim().to_string()));
        }
        if let Some(description) = &patch.description {
            assignments.push("description = ?".to_string());
            bind_values.push(Value::Text(description.clone()));
        }
        if let Some(status) = patch.status {
            assignments.push("status = ?".to_string());
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(priority) = patch.priority {
            assignments.push("priority = ?".to_string());
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(due_date) = &patch.due_date {
            assignments.push("due_date = ?".to_string());
            bind_values.push(due_date.to_db().map_or(Value::Null, Value::Text));
        }

        let sql = format!(
            "UPDATE tasks SET {} WHERE user_id = ? AND project_id = ? AND id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Text(user_id.to_string()));
        bind_values.push(Value::Text(project_id.to_string()));
        bind_values.push(Value::Text(task_id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::not_found("task", task_id));
        }
        Ok(())
    }

    fn delete_task(&self, user_id: &str, project_id: &str, task_id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE user_id = ?1 AND project_id = ?2 AND id = ?3;",
            params![user_id, project_id, task_id],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("task", task_id));
        }
        Ok(())
    }

    fn delete_tasks_for_project(&self, user_id: &str, project_id: &str) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM tasks WHERE user_id = ?1 AND project_id = ?2;",
            params![user_id, project_id],
        )?;
        Ok(removed)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = TaskPriority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid task priority `{priority_text}` in tasks.priority"
        ))
    })?;

    Ok(Task {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        due_date: DueDate::from_db(row.get("due_date")?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
