//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide per-user CRUD over the `projects` table.
//!
//! # Invariants
//! - Every statement filters on `user_id`; other users' rows are invisible.
//! - Lists are ordered newest first (`created_at DESC`).
//! - Deleting a project that still has tasks fails with a store error.

use crate::model::due_date::DueDate;
use crate::model::project::{NewProject, Project, ProjectColor, ProjectId, ProjectPatch};
use crate::repo::{new_record_id, RepoError, RepoResult, NOW_MS_SQL};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    description,
    color,
    due_date,
    created_at,
    updated_at
FROM projects";

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    fn create_project(&self, user_id: &str, project: &NewProject) -> RepoResult<ProjectId>;
    fn list_projects(&self, user_id: &str) -> RepoResult<Vec<Project>>;
    fn get_project(&self, user_id: &str, project_id: &str) -> RepoResult<Option<Project>>;
    fn update_project(&self, user_id: &str, project_id: &str, patch: &ProjectPatch)
        -> RepoResult<()>;
    fn delete_project(&self, user_id: &str, project_id: &str) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, user_id: &str, project: &NewProject) -> RepoResult<ProjectId> {
        project.validate_fields()?;

        let id = new_record_id();
        self.conn.execute(
            "INSERT INTO projects (id, user_id, name, description, color, due_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.as_str(),
                user_id,
                project.name.trim(),
                project.description.as_str(),
                project.color.as_str(),
                project.due_date.to_db(),
            ],
        )?;

        Ok(id)
    }

    fn list_projects(&self, user_id: &str) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([user_id])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn get_project(&self, user_id: &str, project_id: &str) -> RepoResult<Option<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE user_id = ?1 AND id = ?2;"
        ))?;
        let mut rows = stmt.query(params![user_id, project_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn update_project(
        &self,
        user_id: &str,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> RepoResult<()> {
        patch.validate()?;

        let mut assignments = vec![format!("updated_at = {NOW_MS_SQL}")];
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &patch.name {
            assignments.push("name = ?".to_string());
            bind_values.push(Value::Text(name.trim().to_string()));
        }
        if let Some(description) = &patch.description {
            assignments.push("description = ?".to_string());
            bind_values.push(Value::Text(description.clone()));
        }
        if let Some(color) = patch.color {
            assignments.push("color = ?".to_string());
            bind_values.push(Value::Text(color.as_str().to_string()));
        }
        if let Some(due_date) = &patch.due_date {
            assignments.push("due_date = ?".to_string());
            bind_values.push(due_date.to_db().map_or(Value::Null, Value::Text));
        }

        let sql = format!(
            "UPDATE projects SET {} WHERE user_id = ? AND id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Text(user_id.to_string()));
        bind_values.push(Value::Text(project_id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::not_found("project", project_id));
        }
        Ok(())
    }

    fn delete_project(&self, user_id: &str, project_id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM projects WHERE user_id = ?1 AND id = ?2;",
            params![user_id, project_id],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("project", project_id));
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let color_text: String = row.get("color")?;
    let color = ProjectColor::parse(&color_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid color `{color_text}` in projects.color"))
    })?;

    Ok(Project {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        color,
        due_date: DueDate::from_db(row.get("due_date")?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
