//! Deadline notification derivation.
//!
//! # Responsibility
//! - Classify each open task into at most one deadline notification.
//! - Order the result for display: overdue first, caller order otherwise.
//!
//! # Invariants
//! - Tasks with status `done` never produce a notification.
//! - At most one notification per `(project_id, task_id)`.
//! - Malformed tasks (blank id/title, missing/unparseable due date) are
//!   skipped; derivation as a whole never fails.
//! - Output depends only on the inputs and the supplied clock.

use crate::model::due_date::DueDate;
use crate::model::notification::{DeadlineClass, Notification};
use crate::model::task::{Task, TaskStatus};
use chrono::{Local, NaiveDate};
use std::collections::HashSet;

/// Tasks due within this many days (inclusive) get an upcoming notice.
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

/// "Now" as seen by the deriver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationClock {
    /// Current local calendar day (midnight-normalized).
    pub today: NaiveDate,
    /// Stamped into `Notification::created_at`.
    pub generated_at_ms: i64,
}

impl NotificationClock {
    /// Reads the local wall clock.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            today: now.date_naive(),
            generated_at_ms: now.timestamp_millis(),
        }
    }

    pub fn fixed(today: NaiveDate, generated_at_ms: i64) -> Self {
        Self {
            today,
            generated_at_ms,
        }
    }
}

/// Minimal task view consumed by the deriver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineInput<'a> {
    pub task_id: &'a str,
    pub project_id: &'a str,
    pub title: &'a str,
    pub status: TaskStatus,
    pub due_date: &'a DueDate,
    pub project_name: Option<&'a str>,
}

impl<'a> DeadlineInput<'a> {
    pub fn with_project_name(mut self, project_name: &'a str) -> Self {
        self.project_name = Some(project_name);
        self
    }
}

impl<'a> From<&'a Task> for DeadlineInput<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            task_id: task.id.as_str(),
            project_id: task.project_id.as_str(),
            title: task.title.as_str(),
            status: task.status,
            due_date: &task.due_date,
            project_name: None,
        }
    }
}

/// Classifies a due date relative to `today`.
///
/// Returns `None` when the deadline is more than `DUE_SOON_WINDOW_DAYS` away.
pub fn classify_deadline(due: NaiveDate, today: NaiveDate) -> Option<DeadlineClass> {
    let diff_days = due.signed_duration_since(today).num_days();
    match diff_days {
        d if d < 0 => Some(DeadlineClass::Overdue {
            days: saturating_days(-d),
        }),
        0 => Some(DeadlineClass::DueToday),
        d if d <= DUE_SOON_WINDOW_DAYS => Some(DeadlineClass::DueSoon {
            days: saturating_days(d),
        }),
        _ => None,
    }
}

/// Derives display-ready notifications from a batch of tasks.
///
/// Overdue notifications come first; within each group the caller's order is
/// kept (stable partition, not a date sort). Repeated tasks keep only their
/// first occurrence.
pub fn derive_notifications<'a, I, T>(tasks: I, clock: &NotificationClock) -> Vec<Notification>
where
    I: IntoIterator<Item = T>,
    T: Into<DeadlineInput<'a>>,
{
    let mut seen: HashSet<(&'a str, &'a str)> = HashSet::new();
    let mut overdue = Vec::new();
    let mut upcoming = Vec::new();

    for input in tasks.into_iter().map(Into::into) {
        let Some(notification) = notification_for(&input, clock) else {
            continue;
        };
        if !seen.insert((input.project_id.trim(), input.task_id.trim())) {
            continue;
        }
        if notification.is_overdue() {
            overdue.push(notification);
        } else {
            upcoming.push(notification);
        }
    }

    overdue.extend(upcoming);
    overdue
}

fn notification_for(input: &DeadlineInput<'_>, clock: &NotificationClock) -> Option<Notification> {
    if input.status == TaskStatus::Done {
        return None;
    }
    let task_id = input.task_id.trim();
    let title = input.title.trim();
    if task_id.is_empty() || title.is_empty() {
        return None;
    }

    let class = classify_deadline(input.due_date.date()?, clock.today)?;
    Some(Notification {
        id: format!("{task_id}-{}", class.id_suffix()),
        title: class.title().to_string(),
        message: class.message(title),
        kind: class.kind(),
        class,
        task_id: task_id.to_string(),
        task_title: title.to_string(),
        project_id: input.project_id.trim().to_string(),
        project_name: input.project_name.map(str::to_string),
        created_at: clock.generated_at_ms,
        read: false,
    })
}

fn saturating_days(days: i64) -> u32 {
    u32::try_from(days).unwrap_or(u32::MAX)
}
