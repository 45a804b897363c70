//! Deadline notifications: pure derivation plus session read state.
//!
//! Nothing here touches the store; callers fetch tasks first and pass them in.

pub mod deriver;
pub mod inbox;

pub use deriver::{
    classify_deadline, derive_notifications, DeadlineInput, NotificationClock,
    DUE_SOON_WINDOW_DAYS,
};
pub use inbox::NotificationInbox;
