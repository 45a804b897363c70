//! Command-line entry point for the Catchy core.
//!
//! # Responsibility
//! - Exercise core services against a database file for local checks.
//! - Keep output plain and line-oriented.

use catchy_core::config::ENV_CONFIG;
use catchy_core::db::open_db;
use catchy_core::{
    format_time_ago, init_from_config, search_and_sort, CatchyConfig, CommentService,
    DashboardService, DueDate, NewProject, NewTask, NotificationClock, NotificationService,
    ProjectService, ProjectSort, SqliteCommentRepository, SqliteProjectRepository,
    SqliteTaskRepository, TaskPriority, TaskService, TaskStatus, UserContext,
};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use rusqlite::Connection;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "catchy")]
#[command(about = "Projects, task boards and deadline notifications", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file; without it `CATCHY_*` variables are read
    #[arg(long, global = true, value_name = "PATH", env = ENV_CONFIG)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the core library links
    Ping,

    /// List project cards with progress
    Projects {
        user: String,
        /// Case-insensitive match on name or description
        query: Option<String>,
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,
    },

    /// Create a project
    AddProject {
        user: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date, `YYYY-MM-DD`
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
    },

    /// Create a task inside a project
    AddTask {
        user: String,
        project: String,
        title: String,
        /// Due date, `YYYY-MM-DD`
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
    },

    /// Move a task to another board column
    Move {
        user: String,
        project: String,
        task: String,
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Print the three board columns of a project
    Board {
        user: String,
        project: String,
        /// Only show tasks of this priority
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },

    /// Comment on a task
    Comment {
        user: String,
        project: String,
        task: String,
        text: String,
    },

    /// Derive deadline notifications across all projects
    Notifications { user: String },

    /// Print the dashboard counters
    Dashboard { user: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Todo,
    #[value(name = "inProgress", aliases = ["in-progress", "in_progress"])]
    InProgress,
    Done,
}

impl From<StatusArg> for TaskStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Todo => Self::Todo,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Done => Self::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for TaskPriority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Name,
    Progress,
    DueDate,
}

impl From<SortArg> for ProjectSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => Self::Name,
            SortArg::Progress => Self::Progress,
            SortArg::DueDate => Self::DueDate,
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::Ping = cli.command {
        println!("catchy_core ping={}", catchy_core::ping());
        println!("catchy_core version={}", catchy_core::core_version());
        return Ok(());
    }

    let config = CatchyConfig::load(cli.config.as_deref())?;
    init_from_config(&config)?;
    let conn = open_db(&config.db_path)?;
    execute(&conn, cli.command)
}

fn execute(conn: &Connection, command: Command) -> Result<(), Box<dyn Error>> {
    let projects = || SqliteProjectRepository::new(conn);
    let tasks = || SqliteTaskRepository::new(conn);
    let comments = || SqliteCommentRepository::new(conn);
    let today = Local::now().date_naive();

    match command {
        Command::Ping => {}
        Command::Projects { user, query, sort } => {
            let service = ProjectService::new(projects(), tasks(), comments());
            let summaries = search_and_sort(
                service.list_project_summaries(&UserContext::new(user))?,
                query.as_deref().unwrap_or_default(),
                sort.into(),
            );
            for summary in summaries {
                println!(
                    "{}  {}  [{}]  due={}  {}/{} done ({}%)",
                    summary.project.id,
                    summary.project.name,
                    summary.project.color.as_str(),
                    summary.project.due_date,
                    summary.completed_tasks,
                    summary.tasks_count,
                    summary.progress
                );
            }
        }
        Command::AddProject {
            user,
            name,
            description,
            due,
        } => {
            let service = ProjectService::new(projects(), tasks(), comments());
            let mut input = NewProject::new(name);
            input.description = description.unwrap_or_default();
            input.due_date = parse_due(due.as_deref());
            let project = service.create_project(&UserContext::new(user), &input, today)?;
            println!("{}", project.id);
        }
        Command::AddTask {
            user,
            project,
            title,
            due,
            priority,
        } => {
            let service = TaskService::new(tasks(), comments());
            let mut input = NewTask::new(title);
            input.due_date = parse_due(due.as_deref());
            input.priority = priority.into();
            let task = service.create_task(&UserContext::new(user), &project, &input)?;
            println!("{}", task.id);
        }
        Command::Move {
            user,
            project,
            task,
            status,
        } => {
            let service = TaskService::new(tasks(), comments());
            let task =
                service.move_task(&UserContext::new(user), &project, &task, status.into())?;
            println!("{} -> {}", task.id, task.status.label());
        }
        Command::Board {
            user,
            project,
            priority,
        } => {
            let service = TaskService::new(tasks(), comments());
            let board = service.board(
                &UserContext::new(user),
                &project,
                priority.map(TaskPriority::from),
            )?;
            for status in TaskStatus::ALL {
                let column = board.column(status);
                println!("== {} ({})", status.label(), column.len());
                for task in column {
                    println!(
                        "  {}  {}  [{}]  due={}",
                        task.id,
                        task.title,
                        task.priority.as_str(),
                        task.due_date
                    );
                }
            }
        }
        Command::Comment {
            user,
            project,
            task,
            text,
        } => {
            let service = CommentService::new(comments());
            let comment = service.add_comment(&UserContext::new(user), &project, &task, &text)?;
            println!("{}", comment.id);
        }
        Command::Notifications { user } => {
            let service = NotificationService::new(projects(), tasks());
            let clock = NotificationClock::now();
            let notifications = service.all_notifications(&UserContext::new(user), &clock)?;
            if notifications.is_empty() {
                println!("No notifications. You're all caught up!");
            }
            for notification in notifications {
                println!(
                    "[{}] {}: {} (project: {}, {})",
                    notification.badge(),
                    notification.title,
                    notification.message,
                    notification.project_name.as_deref().unwrap_or("-"),
                    format_time_ago(notification.created_at, clock.generated_at_ms)
                );
            }
        }
        Command::Dashboard { user } => {
            let service = DashboardService::new(projects(), tasks());
            let stats = service.stats(&UserContext::new(user), today)?;
            println!("projects={}", stats.total_projects);
            println!("active_tasks={}", stats.active_tasks);
            println!("completed_today={}", stats.completed_today);
            println!("overdue_tasks={}", stats.overdue_tasks);
        }
    }

    Ok(())
}

fn parse_due(raw: Option<&str>) -> DueDate {
    raw.map_or(DueDate::None, DueDate::parse)
}
