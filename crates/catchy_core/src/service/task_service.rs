//! Task use-case service plus board/calendar projections.
//!
//! # Responsibility
//! - Validated task create/update and per-project reads.
//! - Status moves coming from board drag-drop or the quick toggle.
//! - Group tasks into board columns and calendar days.
//!
//! # Invariants
//! - A task lands in exactly one board column, chosen by its status.
//! - Column order follows store order (newest first).
//! - Concurrent edits are last-write-wins; no version check is made.

use crate::model::task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
use crate::model::user::UserContext;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::task_repo::TaskRepository;
use crate::service::{ServiceError, ServiceResult};
use chrono::{Datelike, NaiveDate};
use log::info;
use std::collections::BTreeMap;

/// Three-column board projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

impl TaskBoard {
    /// Groups tasks by status, optionally keeping only one priority.
    pub fn from_tasks(tasks: Vec<Task>, priority: Option<TaskPriority>) -> Self {
        let mut board = Self::default();
        for task in tasks {
            if priority.is_some_and(|wanted| wanted != task.priority) {
                continue;
            }
            match task.status {
                TaskStatus::Todo => board.todo.push(task),
                TaskStatus::InProgress => board.in_progress.push(task),
                TaskStatus::Done => board.done.push(task),
            }
        }
        board
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// List view order: todo, then in progress, then done.
    pub fn iter_list(&self) -> impl Iterator<Item = &Task> {
        self.todo
            .iter()
            .chain(self.in_progress.iter())
            .chain(self.done.iter())
    }
}

/// Groups tasks by due day within one calendar month.
///
/// Tasks without a valid due date, or due outside the month, are left out.
pub fn calendar_month(tasks: &[Task], year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&Task>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        let Some(due) = task.due_date.date() else {
            continue;
        };
        if due.year() == year && due.month() == month {
            days.entry(due).or_default().push(task);
        }
    }
    days
}

/// Task service facade over repository implementations.
pub struct TaskService<T, C> {
    tasks: T,
    comments: C,
}

impl<T, C> TaskService<T, C>
where
    T: TaskRepository,
    C: CommentRepository,
{
    pub fn new(tasks: T, comments: C) -> Self {
        Self { tasks, comments }
    }

    pub fn create_task(
        &self,
        user: &UserContext,
        project_id: &str,
        input: &NewTask,
    ) -> ServiceResult<Task> {
        let task_id = self.tasks.create_task(&user.user_id, project_id, input)?;
        info!(
            "event=task_create module=service status=ok project_id={project_id} task_id={task_id}"
        );
        self.read_back(user, project_id, &task_id, "created task not found in read-back")
    }

    pub fn update_task(
        &self,
        user: &UserContext,
        project_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> ServiceResult<Task> {
        self.tasks
            .update_task(&user.user_id, project_id, task_id, patch)?;
        info!(
            "event=task_update module=service status=ok project_id={project_id} task_id={task_id}"
        );
        self.read_back(user, project_id, task_id, "updated task not found in read-back")
    }

    /// Moves a task to another board column.
    pub fn move_task(
        &self,
        user: &UserContext,
        project_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> ServiceResult<Task> {
        self.update_task(user, project_id, task_id, &TaskPatch::status(status))
    }

    /// Advances status `todo -> inProgress -> done -> todo`.
    pub fn toggle_status(
        &self,
        user: &UserContext,
        project_id: &str,
        task_id: &str,
    ) -> ServiceResult<Task> {
        let current = self.get_task(user, project_id, task_id)?;
        self.move_task(user, project_id, task_id, current.status.next())
    }

    pub fn get_task(
        &self,
        user: &UserContext,
        project_id: &str,
        task_id: &str,
    ) -> ServiceResult<Task> {
        self.tasks
            .get_task(&user.user_id, project_id, task_id)?
            .ok_or_else(|| ServiceError::TaskNotFound(task_id.to_string()))
    }

    pub fn list_tasks(&self, user: &UserContext, project_id: &str) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.list_tasks(&user.user_id, project_id)?)
    }

    /// Deletes a task together with its comment thread.
    pub fn delete_task(
        &self,
        user: &UserContext,
        project_id: &str,
        task_id: &str,
    ) -> ServiceResult<()> {
        let comments_removed =
            self.comments
                .delete_comments_for_task(&user.user_id, project_id, task_id)?;
        self.tasks.delete_task(&user.user_id, project_id, task_id)?;
        info!(
            "event=task_delete module=service status=ok project_id={project_id} task_id={task_id} comments_removed={comments_removed}"
        );
        Ok(())
    }

    /// Fetches a project's tasks and groups them into board columns.
    pub fn board(
        &self,
        user: &UserContext,
        project_id: &str,
        priority: Option<TaskPriority>,
    ) -> ServiceResult<TaskBoard> {
        let tasks = self.list_tasks(user, project_id)?;
        Ok(TaskBoard::from_tasks(tasks, priority))
    }

    fn read_back(
        &self,
        user: &UserContext,
        project_id: &str,
        task_id: &str,
        details: &'static str,
    ) -> ServiceResult<Task> {
        self.tasks
            .get_task(&user.user_id, project_id, task_id)?
            .ok_or(ServiceError::InconsistentState(details))
    }
}
