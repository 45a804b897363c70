//! Session-local notification read state.
//!
//! # Invariants
//! - Read flags live only in memory and are never written to the store.
//! - Refreshing keeps the read flag of every notification id still present.

use crate::model::notification::Notification;
use std::collections::HashSet;

/// Unread counts above this render as `9+`.
const BADGE_MAX: usize = 9;

/// Holds the latest derived notifications plus per-session read flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationInbox {
    items: Vec<Notification>,
}

impl NotificationInbox {
    pub fn new(items: Vec<Notification>) -> Self {
        let mut inbox = Self::default();
        inbox.replace(items);
        inbox
    }

    /// Swaps in a freshly derived batch, carrying over read flags by id.
    pub fn replace(&mut self, fresh: Vec<Notification>) {
        let already_read: HashSet<String> = self
            .items
            .iter()
            .filter(|item| item.read)
            .map(|item| item.id.clone())
            .collect();

        self.items = fresh
            .into_iter()
            .map(|mut item| {
                item.read = item.read || already_read.contains(&item.id);
                item
            })
            .collect();
    }

    /// Marks one notification read. Returns `false` for unknown ids.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    /// Bell badge text; `None` when everything is read.
    pub fn badge_label(&self) -> Option<String> {
        match self.unread_count() {
            0 => None,
            count if count > BADGE_MAX => Some(format!("{BADGE_MAX}+")),
            count => Some(count.to_string()),
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
