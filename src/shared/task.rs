/**
 * Task Data Structures
 *
 * This module defines the task types exchanged between clients and the
 * server, along with input validation for task creation.
 *
 * # Due Times
 *
 * A due time is a clock time with no date component, written as `HH:MM`
 * in 24-hour form. It is interpreted as "the next occurrence of this
 * clock time". Anything that does not match the format exactly is treated
 * as if no due time was given.
 */
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// A to-do item owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,
    /// Owning user's ID
    pub user_id: Uuid,
    /// Task description (never empty)
    pub text: String,
    /// Whether the task is eligible for reminders
    pub urgent: bool,
    /// Completion flag
    pub completed: bool,
    /// Optional `HH:MM` due time
    pub due_time: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Parsed due time, if one is set and well-formed
    pub fn parsed_due_time(&self) -> Option<NaiveTime> {
        self.due_time.as_deref().and_then(parse_due_time)
    }
}

/// Create task request
///
/// All fields are optional at the wire level so that a missing `text`
/// produces a 400 with a readable message instead of a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    pub text: Option<String>,
    pub urgent: Option<bool>,
    pub due_time: Option<String>,
}

/// Validated input for inserting a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub urgent: bool,
    pub due_time: Option<String>,
}

impl CreateTaskRequest {
    /// Validate the request and normalize the due time
    ///
    /// # Errors
    ///
    /// Returns a validation error if `text` is missing or blank.
    pub fn validate(self) -> Result<NewTask, SharedError> {
        let text = self
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SharedError::validation("text", "Task text is required"))?;

        let due_time = self
            .due_time
            .as_deref()
            .and_then(parse_due_time)
            .map(format_due_time);

        Ok(NewTask {
            text,
            urgent: self.urgent.unwrap_or(false),
            due_time,
        })
    }
}

/// Update task request
///
/// When `completed` is omitted the server toggles the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTaskRequest {
    pub completed: Option<bool>,
}

/// Parse a strict `HH:MM` 24-hour clock time
pub fn parse_due_time(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digits_ok = bytes[..2]
        .iter()
        .chain(&bytes[3..])
        .all(u8::is_ascii_digit);
    if !digits_ok {
        return None;
    }

    let hour: u32 = value[..2].parse().ok()?;
    let minute: u32 = value[3..].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Render a clock time back into `HH:MM`
pub fn format_due_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
