//! Caller identity passed explicitly into services.
//!
//! Authentication itself happens outside core; services only need the
//! already-verified owner id to scope every read and write.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the external auth provider.
pub type UserId = String;

/// Per-request user context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: UserId,
    /// Display name shown next to authored comments.
    pub display_name: Option<String>,
}

impl UserContext {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Author label used for comments; blank names fall back to `Anonymous`.
    pub fn author_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous")
            .to_string()
    }
}
