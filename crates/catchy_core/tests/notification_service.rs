use catchy_core::db::open_db_in_memory;
use catchy_core::{
    DashboardService, DueDate, NewProject, NewTask, NotificationClock, NotificationKind,
    NotificationService, Project, ProjectPatch, ProjectRepository, RepoError, RepoResult,
    ServiceError, SqliteProjectRepository, SqliteTaskRepository, Task, TaskPatch, TaskRepository,
    TaskStatus, UserContext,
};
use chrono::{Duration, Local, NaiveDate};
use rusqlite::Connection;

fn fixed_clock() -> NotificationClock {
    NotificationClock::fixed(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(), 0)
}

fn due_in(days: i64) -> DueDate {
    DueDate::On(fixed_clock().today + Duration::days(days))
}

fn seed(conn: &Connection) -> (String, String) {
    let projects = SqliteProjectRepository::new(conn);
    let tasks = SqliteTaskRepository::new(conn);

    let website = projects
        .create_project("u1", &NewProject::new("Website"))
        .unwrap();
    let mobile = projects
        .create_project("u1", &NewProject::new("Mobile"))
        .unwrap();
    projects
        .create_project("u2", &NewProject::new("Someone else"))
        .unwrap();

    for (project, title, due, status) in [
        (&website, "Soon website", due_in(1), TaskStatus::Todo),
        (&website, "Late website", due_in(-2), TaskStatus::InProgress),
        (&mobile, "Today mobile", due_in(0), TaskStatus::Todo),
        (&mobile, "Finished mobile", due_in(-9), TaskStatus::Done),
        (&mobile, "Far mobile", due_in(30), TaskStatus::Todo),
    ] {
        let mut input = NewTask::new(title);
        input.due_date = due;
        input.status = status;
        tasks.create_task("u1", project, &input).unwrap();
    }

    (website, mobile)
}

#[test]
fn aggregates_all_projects_with_names_and_overdue_first() {
    let conn = open_db_in_memory().unwrap();
    let (website, _mobile) = seed(&conn);
    let service = NotificationService::new(
        SqliteProjectRepository::new(&conn),
        SqliteTaskRepository::new(&conn),
    );

    let notifications = service
        .all_notifications(&UserContext::new("u1"), &fixed_clock())
        .unwrap();

    let titles: Vec<&str> = notifications
        .iter()
        .map(|n| n.task_title.as_str())
        .collect();
    // Projects load newest first (Mobile, then Website).
    assert_eq!(titles, vec!["Late website", "Today mobile", "Soon website"]);
    assert_eq!(notifications[0].kind, NotificationKind::Overdue);
    assert_eq!(notifications[0].project_id, website);
    assert_eq!(notifications[0].project_name.as_deref(), Some("Website"));
    assert_eq!(notifications[1].project_name.as_deref(), Some("Mobile"));
}

#[test]
fn single_project_notifications_are_scoped() {
    let conn = open_db_in_memory().unwrap();
    let (_website, mobile) = seed(&conn);
    let service = NotificationService::new(
        SqliteProjectRepository::new(&conn),
        SqliteTaskRepository::new(&conn),
    );
    let user = UserContext::new("u1");

    let notifications = service
        .project_notifications(&user, &mobile, &fixed_clock())
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "\"Today mobile\" is due today");

    let err = service
        .project_notifications(&user, "missing", &fixed_clock())
        .unwrap_err();
    assert!(matches!(err, ServiceError::ProjectNotFound(_)));
}

/// Delegates to SQLite but fails task lists for one project.
struct FlakyTasks<'conn> {
    inner: SqliteTaskRepository<'conn>,
    failing_project: String,
}

impl TaskRepository for FlakyTasks<'_> {
    fn create_task(&self, user_id: &str, project_id: &str, task: &NewTask) -> RepoResult<String> {
        self.inner.create_task(user_id, project_id, task)
    }

    fn list_tasks(&self, user_id: &str, project_id: &str) -> RepoResult<Vec<Task>> {
        if project_id == self.failing_project {
            return Err(RepoError::Db(rusqlite::Error::InvalidQuery.into()));
        }
        self.inner.list_tasks(user_id, project_id)
    }

    fn get_task(&self, user_id: &str, project_id: &str, task_id: &str) -> RepoResult<Option<Task>> {
        self.inner.get_task(user_id, project_id, task_id)
    }

    fn update_task(
        &self,
        user_id: &str,
        project_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> RepoResult<()> {
        self.inner.update_task(user_id, project_id, task_id, patch)
    }

    fn delete_task(&self, user_id: &str, project_id: &str, task_id: &str) -> RepoResult<()> {
        self.inner.delete_task(user_id, project_id, task_id)
    }

    fn delete_tasks_for_project(&self, user_id: &str, project_id: &str) -> RepoResult<usize> {
        self.inner.delete_tasks_for_project(user_id, project_id)
    }
}

#[test]
fn one_failing_project_fetch_aborts_the_aggregate() {
    let conn = open_db_in_memory().unwrap();
    let (website, _mobile) = seed(&conn);
    let service = NotificationService::new(
        SqliteProjectRepository::new(&conn),
        FlakyTasks {
            inner: SqliteTaskRepository::new(&conn),
            failing_project: website,
        },
    );

    let err = service
        .all_notifications(&UserContext::new("u1"), &fixed_clock())
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::Db(_))));
    assert_eq!(err.code(), "store_unavailable");
}

/// Project store that is always down.
struct UnavailableProjects;

impl ProjectRepository for UnavailableProjects {
    fn create_project(&self, _user_id: &str, _project: &NewProject) -> RepoResult<String> {
        Err(RepoError::Db(rusqlite::Error::InvalidQuery.into()))
    }

    fn list_projects(&self, _user_id: &str) -> RepoResult<Vec<Project>> {
        Err(RepoError::Db(rusqlite::Error::InvalidQuery.into()))
    }

    fn get_project(&self, _user_id: &str, _project_id: &str) -> RepoResult<Option<Project>> {
        Err(RepoError::Db(rusqlite::Error::InvalidQuery.into()))
    }

    fn update_project(
        &self,
        _user_id: &str,
        _project_id: &str,
        _patch: &ProjectPatch,
    ) -> RepoResult<()> {
        Err(RepoError::Db(rusqlite::Error::InvalidQuery.into()))
    }

    fn delete_project(&self, _user_id: &str, _project_id: &str) -> RepoResult<()> {
        Err(RepoError::Db(rusqlite::Error::InvalidQuery.into()))
    }
}

#[test]
fn unavailable_store_surfaces_generic_error() {
    let conn = open_db_in_memory().unwrap();
    let service = NotificationService::new(UnavailableProjects, SqliteTaskRepository::new(&conn));

    let err = service
        .all_notifications(&UserContext::new("u1"), &fixed_clock())
        .unwrap_err();
    assert!(err.to_string().starts_with("task store unavailable"));
}

#[test]
fn dashboard_counts_span_every_project() {
    let conn = open_db_in_memory().unwrap();
    let projects = SqliteProjectRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);
    let today = Local::now().date_naive();

    let mut project_ids = Vec::new();
    for name in ["One", "Two", "Three", "Four"] {
        project_ids.push(projects.create_project("u1", &NewProject::new(name)).unwrap());
    }
    for project_id in &project_ids {
        let mut late = NewTask::new("Late task");
        late.due_date = DueDate::On(today - Duration::days(1));
        tasks.create_task("u1", project_id, &late).unwrap();
    }
    let finished = tasks
        .create_task("u1", &project_ids[3], &NewTask::new("Finished"))
        .unwrap();
    tasks
        .update_task("u1", &project_ids[3], &finished, &TaskPatch::status(TaskStatus::Done))
        .unwrap();

    let stats = DashboardService::new(projects, tasks)
        .stats(&UserContext::new("u1"), today)
        .unwrap();
    assert_eq!(stats.total_projects, 4);
    assert_eq!(stats.active_tasks, 4);
    assert_eq!(stats.overdue_tasks, 4);
    assert_eq!(stats.completed_today, 1);
}

#[test]
fn corrupt_task_row_does_not_hide_other_notifications() {
    let conn = open_db_in_memory().unwrap();
    let projects = SqliteProjectRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);
    let project_id = projects
        .create_project("u1", &NewProject::new("Website"))
        .unwrap();

    let mut late = NewTask::new("Late report");
    late.due_date = due_in(-2);
    tasks.create_task("u1", &project_id, &late).unwrap();
    let mut blocked = NewTask::new("Blocked deploy");
    blocked.due_date = due_in(0);
    let blocked_id = tasks.create_task("u1", &project_id, &blocked).unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE tasks SET status = 'blocked' WHERE id = ?1;",
        [&blocked_id],
    )
    .unwrap();

    let service = NotificationService::new(
        SqliteProjectRepository::new(&conn),
        SqliteTaskRepository::new(&conn),
    );
    let user = UserContext::new("u1");
    let notifications = service.all_notifications(&user, &fixed_clock()).unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "\"Late report\" is 2 days overdue");

    let scoped = service
        .project_notifications(&user, &project_id, &fixed_clock())
        .unwrap();
    assert_eq!(scoped, notifications);

    let stats = DashboardService::new(projects, tasks)
        .stats(&user, fixed_clock().today)
        .unwrap();
    assert_eq!(stats.active_tasks, 1);
    assert_eq!(stats.overdue_tasks, 1);
}
