//! Due date value shared by projects and tasks.
//!
//! # Responsibility
//! - Parse stored/user-supplied due date text into a calendar date.
//! - Preserve unparseable text instead of failing the whole record read.
//!
//! # Invariants
//! - `DueDate::None` is stored as SQL `NULL`.
//! - Empty text and the legacy `No due date` literal both read as `None`.
//! - Parsing never fails; bad input becomes `DueDate::Unparsed`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Legacy sentinel written by older clients when no date was picked.
pub const NO_DUE_DATE_SENTINEL: &str = "No due date";

const DATE_FORMAT: &str = "%Y-%m-%d";
const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Optional calendar deadline attached to a project or task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum DueDate {
    /// No deadline was set.
    #[default]
    None,
    /// A valid calendar date (time-of-day already discarded).
    On(NaiveDate),
    /// Raw text that could not be read as a date.
    Unparsed(String),
}

impl DueDate {
    /// Parses free-form due date text.
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and `YYYY-MM-DDTHH:MM:SS`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_DUE_DATE_SENTINEL) {
            return Self::None;
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return Self::On(date);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::On(stamp.date_naive());
        }
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, LOCAL_DATETIME_FORMAT) {
            return Self::On(stamp.date());
        }

        Self::Unparsed(trimmed.to_string())
    }

    /// Returns the calendar date when one is set and valid.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::On(date) => Some(*date),
            Self::None | Self::Unparsed(_) => None,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Storage representation. `None` maps to SQL `NULL`.
    pub fn to_db(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::On(date) => Some(date.format(DATE_FORMAT).to_string()),
            Self::Unparsed(raw) => Some(raw.clone()),
        }
    }

    pub fn from_db(value: Option<String>) -> Self {
        value.map_or(Self::None, |raw| Self::parse(&raw))
    }
}

impl From<NaiveDate> for DueDate {
    fn from(value: NaiveDate) -> Self {
        Self::On(value)
    }
}

impl From<Option<String>> for DueDate {
    fn from(value: Option<String>) -> Self {
        Self::from_db(value)
    }
}

impl From<DueDate> for Option<String> {
    fn from(value: DueDate) -> Self {
        value.to_db()
    }
}

impl Display for DueDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "{NO_DUE_DATE_SENTINEL}"),
            Self::On(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::Unparsed(raw) => write!(f, "{raw}"),
        }
    }
}
