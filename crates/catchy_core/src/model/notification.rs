//! Derived deadline notifications.
//!
//! # Responsibility
//! - Define the notification record rendered by dropdown and list views.
//! - Own the wording rules for titles and messages.
//!
//! # Invariants
//! - Notifications are never persisted; `read` is session-local state.
//! - `id` is `{task_id}-{suffix}` where suffix is unique per classification.

use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};

/// Display category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Overdue,
    Deadline,
    Info,
}

/// Deadline pressure for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum DeadlineClass {
    /// Due date passed `days` days ago (always >= 1).
    Overdue { days: u32 },
    DueToday,
    /// Due in `days` days (1..=3).
    DueSoon { days: u32 },
}

impl DeadlineClass {
    pub fn kind(self) -> NotificationKind {
        match self {
            Self::Overdue { .. } => NotificationKind::Overdue,
            Self::DueToday | Self::DueSoon { .. } => NotificationKind::Deadline,
        }
    }

    /// Suffix appended to the task id to build the notification id.
    pub fn id_suffix(self) -> &'static str {
        match self {
            Self::Overdue { .. } => "overdue",
            Self::DueToday => "today",
            Self::DueSoon { .. } => "soon",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Overdue { .. } => "Overdue Task",
            Self::DueToday => "Task Due Today",
            Self::DueSoon { .. } => "Upcoming Deadline",
        }
    }

    /// Human-readable message naming the task and the day count.
    pub fn message(self, task_title: &str) -> String {
        match self {
            Self::Overdue { days } => {
                format!("\"{task_title}\" is {} overdue", day_count(days))
            }
            Self::DueToday => format!("\"{task_title}\" is due today"),
            Self::DueSoon { days } => format!("\"{task_title}\" is due in {}", day_count(days)),
        }
    }
}

/// A rendered alert about a missed or approaching deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub class: DeadlineClass,
    pub task_id: TaskId,
    pub task_title: String,
    pub project_id: ProjectId,
    /// Present when the caller resolved the owning project.
    pub project_name: Option<String>,
    /// Generation time in epoch milliseconds.
    pub created_at: i64,
    pub read: bool,
}

impl Notification {
    pub fn is_overdue(&self) -> bool {
        self.kind == NotificationKind::Overdue
    }

    /// Badge text for list views.
    pub fn badge(&self) -> &'static str {
        if self.is_overdue() {
            "Overdue"
        } else {
            "Upcoming"
        }
    }
}

/// Relative age label: `Just now`, `5m ago`, `3h ago`, `2d ago`.
pub fn format_time_ago(created_at_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - created_at_ms).max(0) / 1000;
    if seconds < 60 {
        return "Just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

fn day_count(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_time_ago, DeadlineClass, NotificationKind};

    #[test]
    fn messages_pluralize_day_counts() {
        assert_eq!(
            DeadlineClass::Overdue { days: 1 }.message("A"),
            "\"A\" is 1 day overdue"
        );
        assert_eq!(
            DeadlineClass::Overdue { days: 2 }.message("A"),
            "\"A\" is 2 days overdue"
        );
        assert_eq!(
            DeadlineClass::DueSoon { days: 1 }.message("B"),
            "\"B\" is due in 1 day"
        );
        assert_eq!(
            DeadlineClass::DueSoon { days: 3 }.message("B"),
            "\"B\" is due in 3 days"
        );
    }

    #[test]
    fn due_today_and_due_soon_share_deadline_kind() {
        assert_eq!(DeadlineClass::DueToday.kind(), NotificationKind::Deadline);
        assert_eq!(
            DeadlineClass::DueSoon { days: 2 }.kind(),
            NotificationKind::Deadline
        );
        assert_ne!(
            DeadlineClass::DueToday.id_suffix(),
            DeadlineClass::DueSoon { days: 2 }.id_suffix()
        );
    }

    #[test]
    fn time_ago_buckets() {
        let now = 10_000_000_000;
        assert_eq!(format_time_ago(now - 5_000, now), "Just now");
        assert_eq!(format_time_ago(now - 5 * 60_000, now), "5m ago");
        assert_eq!(format_time_ago(now - 3 * 3_600_000, now), "3h ago");
        assert_eq!(format_time_ago(now - 50 * 3_600_000, now), "2d ago");
        assert_eq!(format_time_ago(now + 1_000, now), "Just now");
    }
}
