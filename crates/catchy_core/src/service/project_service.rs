//! Project use-case service.
//!
//! # Responsibility
//! - Validated project create/update and per-user reads.
//! - Explicit child cleanup on delete (comments, then tasks, then project).
//! - Summary projections for the project grid: counts, progress, search, sort.
//!
//! # Invariants
//! - Validation errors never reach the store.
//! - `progress` is `round(done / total * 100)`, and `0` for empty projects.

use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::model::task::TaskStatus;
use crate::model::user::UserContext;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::ValidationError;
use crate::service::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::{error, info};
use std::cmp::Ordering;

/// Project card projection with task statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project: Project,
    pub tasks_count: usize,
    pub completed_tasks: usize,
    /// Percentage in `0..=100`.
    pub progress: u8,
}

/// Sort order for project cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSort {
    /// Case-insensitive A-Z.
    #[default]
    Name,
    /// Highest progress first.
    Progress,
    /// Earliest due date first; undated projects last.
    DueDate,
}

/// Project service facade over repository implementations.
pub struct ProjectService<P, T, C> {
    projects: P,
    tasks: T,
    comments: C,
}

impl<P, T, C> ProjectService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: CommentRepository,
{
    pub fn new(projects: P, tasks: T, comments: C) -> Self {
        Self {
            projects,
            tasks,
            comments,
        }
    }

    /// Creates a project after validating the form against `today`.
    pub fn create_project(
        &self,
        user: &UserContext,
        input: &NewProject,
        today: NaiveDate,
    ) -> ServiceResult<Project> {
        input
            .validate(today)
            .map_err(|err| ServiceError::Validation(ValidationError::Project(err)))?;

        let project_id = self
            .projects
            .create_project(&user.user_id, input)
            .inspect_err(|err| {
                error!("event=project_create module=service status=error error={err}");
            })?;
        info!("event=project_create module=service status=ok project_id={project_id}");

        self.projects
            .get_project(&user.user_id, &project_id)?
            .ok_or(ServiceError::InconsistentState(
                "created project not found in read-back",
            ))
    }

    pub fn update_project(
        &self,
        user: &UserContext,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> ServiceResult<Project> {
        self.projects
            .update_project(&user.user_id, project_id, patch)?;
        info!("event=project_update module=service status=ok project_id={project_id}");

        self.projects
            .get_project(&user.user_id, project_id)?
            .ok_or(ServiceError::InconsistentState(
                "updated project not found in read-back",
            ))
    }

    pub fn get_project(&self, user: &UserContext, project_id: &str) -> ServiceResult<Project> {
        self.projects
            .get_project(&user.user_id, project_id)?
            .ok_or_else(|| ServiceError::ProjectNotFound(project_id.to_string()))
    }

    /// Lists the user's projects, newest first.
    pub fn list_projects(&self, user: &UserContext) -> ServiceResult<Vec<Project>> {
        Ok(self.projects.list_projects(&user.user_id)?)
    }

    /// Deletes a project and everything under it.
    ///
    /// Steps run one after another without a transaction; a failure part-way
    /// leaves the remaining rows for a retry.
    pub fn delete_project(&self, user: &UserContext, project_id: &str) -> ServiceResult<()> {
        if self
            .projects
            .get_project(&user.user_id, project_id)?
            .is_none()
        {
            return Err(ServiceError::ProjectNotFound(project_id.to_string()));
        }

        let comments_removed = self
            .comments
            .delete_comments_for_project(&user.user_id, project_id)?;
        let tasks_removed = self
            .tasks
            .delete_tasks_for_project(&user.user_id, project_id)?;
        self.projects
            .delete_project(&user.user_id, project_id)
            .inspect_err(|err| {
                error!(
                    "event=project_delete module=service status=error project_id={project_id} error={err}"
                );
            })?;

        info!(
            "event=project_delete module=service status=ok project_id={project_id} tasks_removed={tasks_removed} comments_removed={comments_removed}"
        );
        Ok(())
    }

    /// Loads every project with its task statistics (one task fetch per project).
    pub fn list_project_summaries(&self, user: &UserContext) -> ServiceResult<Vec<ProjectSummary>> {
        let projects = self.projects.list_projects(&user.user_id)?;
        let mut summaries = Vec::with_capacity(projects.len());
        for project in projects {
            let tasks = self.tasks.list_decodable_tasks(&user.user_id, &project.id)?;
            let completed_tasks = tasks
                .iter()
                .filter(|task| task.status == TaskStatus::Done)
                .count();
            summaries.push(ProjectSummary {
                progress: progress_percent(completed_tasks, tasks.len()),
                tasks_count: tasks.len(),
                completed_tasks,
                project,
            });
        }
        Ok(summaries)
    }
}

/// Rounded completion percentage; empty projects report `0`.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (completed.min(total) * 100 + total / 2) / total;
    u8::try_from(rounded).unwrap_or(100)
}

/// Filters summaries by a case-insensitive name/description match, then sorts.
///
/// An empty or blank query keeps every summary.
pub fn search_and_sort(
    summaries: Vec<ProjectSummary>,
    query: &str,
    sort: ProjectSort,
) -> Vec<ProjectSummary> {
    let needle = query.trim().to_lowercase();
    let mut matched: Vec<ProjectSummary> = summaries
        .into_iter()
        .filter(|summary| {
            needle.is_empty()
                || summary.project.name.to_lowercase().contains(&needle)
                || summary.project.description.to_lowercase().contains(&needle)
        })
        .collect();

    matched.sort_by(|a, b| compare_summaries(a, b, sort));
    matched
}

fn compare_summaries(a: &ProjectSummary, b: &ProjectSummary, sort: ProjectSort) -> Ordering {
    match sort {
        ProjectSort::Name => a
            .project
            .name
            .to_lowercase()
            .cmp(&b.project.name.to_lowercase())
            .then_with(|| a.project.name.cmp(&b.project.name)),
        ProjectSort::Progress => b.progress.cmp(&a.progress),
        ProjectSort::DueDate => match (a.project.due_date.date(), b.project.due_date.date()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::progress_percent;

    #[test]
    fn progress_rounds_half_up_and_handles_empty() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 8), 13);
        assert_eq!(progress_percent(5, 5), 100);
    }
}
