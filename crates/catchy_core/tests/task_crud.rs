use catchy_core::db::open_db_in_memory;
use catchy_core::{
    DueDate, NewProject, NewTask, ProjectRepository, RepoError, ServiceError,
    SqliteCommentRepository, SqliteProjectRepository, SqliteTaskRepository, TaskPatch,
    TaskPriority, TaskRepository, TaskService, TaskStatus, UserContext,
};
use rusqlite::Connection;

fn seed_project(conn: &Connection, user_id: &str, name: &str) -> String {
    SqliteProjectRepository::new(conn)
        .create_project(user_id, &NewProject::new(name))
        .unwrap()
}

fn service(conn: &Connection) -> TaskService<SqliteTaskRepository<'_>, SqliteCommentRepository<'_>> {
    TaskService::new(
        SqliteTaskRepository::new(conn),
        SqliteCommentRepository::new(conn),
    )
}

#[test]
fn create_defaults_to_todo_and_medium() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let service = service(&conn);
    let user = UserContext::new("u1");

    let task = service
        .create_task(&user, &project_id, &NewTask::new("  Design homepage  "))
        .unwrap();
    assert_eq!(task.title, "Design homepage");
    assert_eq!(task.project_id, project_id);
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert_eq!(task.due_date, DueDate::None);
}

#[test]
fn create_under_foreign_project_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "owner", "Private");
    let repo = SqliteTaskRepository::new(&conn);

    let err = repo
        .create_task("intruder", &project_id, &NewTask::new("Sneaky"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "project", .. }));
}

#[test]
fn short_title_is_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let service = service(&conn);
    let user = UserContext::new("u1");

    let err = service
        .create_task(&user, &project_id, &NewTask::new("ab"))
        .unwrap_err();
    match err {
        ServiceError::Validation(validation) => assert_eq!(validation.field(), "title"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list_tasks(&user, &project_id).unwrap().is_empty());
}

#[test]
fn move_and_toggle_change_board_column() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let service = service(&conn);
    let user = UserContext::new("u1");

    let task = service
        .create_task(&user, &project_id, &NewTask::new("Build nav"))
        .unwrap();

    let moved = service
        .move_task(&user, &project_id, &task.id, TaskStatus::Done)
        .unwrap();
    assert_eq!(moved.status, TaskStatus::Done);

    let toggled = service.toggle_status(&user, &project_id, &task.id).unwrap();
    assert_eq!(toggled.status, TaskStatus::Todo);

    let board = service.board(&user, &project_id, None).unwrap();
    assert_eq!(board.todo.len(), 1);
    assert!(board.in_progress.is_empty());
    assert!(board.done.is_empty());
}

#[test]
fn last_write_wins_on_concurrent_edits() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let service = service(&conn);
    let user = UserContext::new("u1");
    let task = service
        .create_task(&user, &project_id, &NewTask::new("Contested"))
        .unwrap();

    let first = TaskPatch {
        priority: Some(TaskPriority::High),
        description: Some("from tab A".to_string()),
        ..TaskPatch::default()
    };
    let second = TaskPatch {
        description: Some("from tab B".to_string()),
        ..TaskPatch::default()
    };
    service
        .update_task(&user, &project_id, &task.id, &first)
        .unwrap();
    let final_state = service
        .update_task(&user, &project_id, &task.id, &second)
        .unwrap();

    assert_eq!(final_state.description, "from tab B");
    assert_eq!(final_state.priority, TaskPriority::High);
}

#[test]
fn update_and_delete_missing_task_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let service = service(&conn);
    let user = UserContext::new("u1");

    let err = service
        .move_task(&user, &project_id, "ghost", TaskStatus::Done)
        .unwrap_err();
    assert!(matches!(err, ServiceError::TaskNotFound(id) if id == "ghost"));

    let err = service.delete_task(&user, &project_id, "ghost").unwrap_err();
    assert!(matches!(err, ServiceError::TaskNotFound(_)));
}

#[test]
fn board_filters_by_priority() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let service = service(&conn);
    let user = UserContext::new("u1");

    for (title, priority, status) in [
        ("Kickoff meeting", TaskPriority::High, TaskStatus::Done),
        ("Gather requirements", TaskPriority::Medium, TaskStatus::Done),
        ("Build navigation", TaskPriority::High, TaskStatus::InProgress),
        ("Review competitors", TaskPriority::Low, TaskStatus::Todo),
    ] {
        let mut input = NewTask::new(title);
        input.priority = priority;
        input.status = status;
        service.create_task(&user, &project_id, &input).unwrap();
    }

    let high = service
        .board(&user, &project_id, Some(TaskPriority::High))
        .unwrap();
    assert_eq!(high.total(), 2);
    assert_eq!(high.in_progress[0].title, "Build navigation");
    assert_eq!(high.done[0].title, "Kickoff meeting");
}

#[test]
fn unknown_status_in_store_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let repo = SqliteTaskRepository::new(&conn);
    let id = repo
        .create_task("u1", &project_id, &NewTask::new("Corrupt me"))
        .unwrap();
    corrupt_task(&conn, &id, "status = 'archived'");

    let err = repo.list_tasks("u1", &project_id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    let err = repo.get_task("u1", &project_id, &id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn decodable_listing_skips_corrupt_rows_and_keeps_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let repo = SqliteTaskRepository::new(&conn);
    let kept = repo
        .create_task("u1", &project_id, &NewTask::new("Still fine"))
        .unwrap();
    let bad_status = repo
        .create_task("u1", &project_id, &NewTask::new("Blocked one"))
        .unwrap();
    let bad_priority = repo
        .create_task("u1", &project_id, &NewTask::new("Urgent one"))
        .unwrap();
    corrupt_task(&conn, &bad_status, "status = 'blocked'");
    corrupt_task(&conn, &bad_priority, "priority = 'urgent'");

    let tasks = repo.list_decodable_tasks("u1", &project_id).unwrap();
    let ids: Vec<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, vec![kept.as_str()]);
}

/// Writes an out-of-range value the schema would normally refuse.
fn corrupt_task(conn: &Connection, task_id: &str, assignment: &str) {
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        &format!("UPDATE tasks SET {assignment} WHERE id = ?1;"),
        [task_id],
    )
    .unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = OFF;")
        .unwrap();
}

#[test]
fn legacy_sentinel_due_date_reads_back_as_none() {
    let conn = open_db_in_memory().unwrap();
    let project_id = seed_project(&conn, "u1", "Website");
    let repo = SqliteTaskRepository::new(&conn);
    let id = repo
        .create_task("u1", &project_id, &NewTask::new("Legacy"))
        .unwrap();
    conn.execute(
        "UPDATE tasks SET due_date = 'No due date' WHERE id = ?1;",
        [&id],
    )
    .unwrap();

    let task = repo.get_task("u1", &project_id, &id).unwrap().unwrap();
    assert_eq!(task.due_date, DueDate::None);
}
