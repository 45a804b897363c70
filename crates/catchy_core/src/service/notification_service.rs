//! Notification aggregation across a user's projects.
//!
//! # Responsibility
//! - Fetch tasks project by project and feed them to the deriver.
//! - Attach project names for list views.
//!
//! # Invariants
//! - One task fetch per project, issued sequentially, no cap.
//! - Any failing fetch aborts the whole aggregate; no partial result.
//! - Rows that fail to decode are skipped, not treated as a failing fetch.
//! - Nothing is cached; every call re-reads the store.

use crate::model::notification::Notification;
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::user::UserContext;
use crate::notify::{derive_notifications, DeadlineInput, NotificationClock};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{error, info};
use std::time::Instant;

pub struct NotificationService<P, T> {
    projects: P,
    tasks: T,
}

impl<P, T> NotificationService<P, T>
where
    P: ProjectRepository,
    T: TaskRepository,
{
    pub fn new(projects: P, tasks: T) -> Self {
        Self { projects, tasks }
    }

    /// Derives notifications for every project the user owns.
    pub fn all_notifications(
        &self,
        user: &UserContext,
        clock: &NotificationClock,
    ) -> ServiceResult<Vec<Notification>> {
        let started_at = Instant::now();
        let loaded = self.load_all_tasks(user).inspect_err(|err| {
            error!(
                "event=notifications_load module=service status=error duration_ms={} error_code={} error={err}",
                started_at.elapsed().as_millis(),
                err.code()
            );
        })?;

        let inputs = loaded.iter().flat_map(|(project, tasks)| {
            tasks
                .iter()
                .map(move |task| DeadlineInput::from(task).with_project_name(&project.name))
        });
        let notifications = derive_notifications(inputs, clock);

        info!(
            "event=notifications_load module=service status=ok duration_ms={} projects={} notifications={}",
            started_at.elapsed().as_millis(),
            loaded.len(),
            notifications.len()
        );
        Ok(notifications)
    }

    /// Derives notifications for a single project.
    pub fn project_notifications(
        &self,
        user: &UserContext,
        project_id: &str,
        clock: &NotificationClock,
    ) -> ServiceResult<Vec<Notification>> {
        let project = self
            .projects
            .get_project(&user.user_id, project_id)?
            .ok_or_else(|| ServiceError::ProjectNotFound(project_id.to_string()))?;
        let tasks = self.tasks.list_decodable_tasks(&user.user_id, &project.id)?;
        Ok(derive_notifications(
            tasks
                .iter()
                .map(|task| DeadlineInput::from(task).with_project_name(&project.name)),
            clock,
        ))
    }

    /// Loads each project paired with its tasks, in store order.
    pub fn load_all_tasks(&self, user: &UserContext) -> ServiceResult<Vec<(Project, Vec<Task>)>> {
        let projects = self.projects.list_projects(&user.user_id)?;
        let mut loaded = Vec::with_capacity(projects.len());
        for project in projects {
            let tasks = self.tasks.list_decodable_tasks(&user.user_id, &project.id)?;
            loaded.push((project, tasks));
        }
        Ok(loaded)
    }
}
