//! Dashboard headline counters.
//!
//! Counts span every project of the user; there is no first-N slicing.

use crate::model::task::{Task, TaskStatus};
use crate::model::user::UserContext;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::ServiceResult;
use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_projects: usize,
    /// Tasks not yet done.
    pub active_tasks: usize,
    /// Done tasks last updated on `today` (local time).
    pub completed_today: usize,
    /// Not-done tasks whose due date is before `today`.
    pub overdue_tasks: usize,
}

impl DashboardStats {
    /// Folds one project's tasks into the counters.
    pub fn add_tasks(&mut self, tasks: &[Task], today: NaiveDate) {
        for task in tasks {
            match task.status {
                TaskStatus::Done => {
                    if local_day(task.updated_at) == Some(today) {
                        self.completed_today += 1;
                    }
                }
                TaskStatus::Todo | TaskStatus::InProgress => {
                    self.active_tasks += 1;
                    if task.due_date.date().is_some_and(|due| due < today) {
                        self.overdue_tasks += 1;
                    }
                }
            }
        }
    }
}

pub struct DashboardService<P, T> {
    projects: P,
    tasks: T,
}

impl<P, T> DashboardService<P, T>
where
    P: ProjectRepository,
    T: TaskRepository,
{
    pub fn new(projects: P, tasks: T) -> Self {
        Self { projects, tasks }
    }

    pub fn stats(&self, user: &UserContext, today: NaiveDate) -> ServiceResult<DashboardStats> {
        let projects = self.projects.list_projects(&user.user_id)?;
        let mut stats = DashboardStats {
            total_projects: projects.len(),
            ..DashboardStats::default()
        };
        for project in &projects {
            let tasks = self.tasks.list_decodable_tasks(&user.user_id, &project.id)?;
            stats.add_tasks(&tasks, today);
        }
        Ok(stats)
    }
}

fn local_day(epoch_ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|stamp| stamp.date_naive())
}
