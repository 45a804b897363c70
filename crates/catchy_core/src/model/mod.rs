//! Domain model for projects, tasks and derived notifications.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep form validation next to the shapes it validates.
//!
//! # Invariants
//! - Every project is owned by exactly one user.
//! - Every task belongs to exactly one project.
//! - Notifications are derived on demand and never stored.

pub mod comment;
pub mod due_date;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;
