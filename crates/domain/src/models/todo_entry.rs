//! ToDo entry domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a ToDo entry.
///
/// Serialized by name. Deserialization also accepts the ordinal form
/// (`0`, `1`, `2`) and case-insensitive names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StatusRepr")]
pub enum ToDoStatus {
    #[default]
    ToDo,
    Doing,
    Done,
}

impl ToDoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToDoStatus::ToDo => "ToDo",
            ToDoStatus::Doing => "Doing",
            ToDoStatus::Done => "Done",
        }
    }

    pub fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            0 => Some(ToDoStatus::ToDo),
            1 => Some(ToDoStatus::Doing),
            2 => Some(ToDoStatus::Done),
            _ => None,
        }
    }
}

impl fmt::Display for ToDoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToDoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(ToDoStatus::ToDo),
            "doing" => Ok(ToDoStatus::Doing),
            "done" => Ok(ToDoStatus::Done),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Index(u8),
    Name(String),
}

impl TryFrom<StatusRepr> for ToDoStatus {
    type Error = String;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Index(value) => ToDoStatus::from_ordinal(value)
                .ok_or_else(|| format!("Invalid status: {}", value)),
            StatusRepr::Name(name) => name.parse(),
        }
    }
}

/// A stored ToDo entry.
///
/// `version` increments on every successful write and backs the
/// optimistic-concurrency check on updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToDoEntry {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ToDoStatus,
    pub pending_approval: Option<bool>,
    pub create_time: DateTime<Utc>,
    pub update_time: Option<DateTime<Utc>>,
    pub approved_time: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub version: i64,
}

impl ToDoEntry {
    pub fn is_pending_approval(&self) -> bool {
        self.pending_approval.unwrap_or(false)
    }

    pub fn is_approved(&self) -> bool {
        self.approved_time.is_some()
    }
}

/// Entry data handed to a store for insertion.
///
/// The store assigns id, timestamps and the initial version.
#[derive(Debug, Clone, PartialEq)]
pub struct NewToDoEntry {
    pub title: String,
    pub description: String,
    pub status: ToDoStatus,
    pub pending_approval: Option<bool>,
    pub created_by: Uuid,
}

/// Request payload for creating an entry.
///
/// Fields outside the client-writable set are ignored on input.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateToDoEntryRequest {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Title must be between 1 and 128 characters"
    ))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 512,
        message = "Description must be between 1 and 512 characters"
    ))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub description: String,

    #[serde(default)]
    pub status: ToDoStatus,
}

/// Sparse update payload.
///
/// Absent fields leave the stored value unchanged. `version`, when
/// supplied, must match the stored entry version.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateToDoEntryRequest {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Title must be between 1 and 128 characters"
    ))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: Option<String>,

    #[validate(length(
        min = 1,
        max = 512,
        message = "Description must be between 1 and 512 characters"
    ))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub description: Option<String>,

    pub status: Option<ToDoStatus>,

    pub version: Option<i64>,
}

/// Query parameters for the confirmation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmCompletionQuery {
    pub confirm: bool,
    pub version: Option<i64>,
}
