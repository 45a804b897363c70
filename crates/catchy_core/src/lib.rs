//! Core domain logic for Catchy.
//! This crate is the single source of truth for project/task business rules
//! and deadline notification derivation.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use config::{CatchyConfig, ConfigError};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::comment::TaskComment;
pub use model::due_date::DueDate;
pub use model::notification::{format_time_ago, DeadlineClass, Notification, NotificationKind};
pub use model::project::{NewProject, Project, ProjectColor, ProjectPatch, ProjectValidationError};
pub use model::task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus, TaskValidationError};
pub use model::user::UserContext;
pub use notify::{
    classify_deadline, derive_notifications, DeadlineInput, NotificationClock, NotificationInbox,
};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult, ValidationError};
pub use service::comment_service::CommentService;
pub use service::dashboard_service::{DashboardService, DashboardStats};
pub use service::notification_service::NotificationService;
pub use service::project_service::{search_and_sort, ProjectService, ProjectSort, ProjectSummary};
pub use service::task_service::{calendar_month, TaskBoard, TaskService};
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
