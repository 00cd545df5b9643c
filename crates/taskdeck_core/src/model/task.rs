//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its enumerated fields.
//! - Normalize user input (`TaskInput`, `TaskPatch`) into valid tasks.
//! - Own the persisted wire shape (camelCase field names, date-only due date).
//!
//! # Invariants
//! - `title` is never empty after trimming.
//! - `id` is never empty and is never reassigned.
//! - `updated_at >= created_at`.
//! - Decoding a task runs the same validation as creating one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque task identifier.
///
/// New tasks receive a UUID v4 string; identifiers loaded from storage are
/// accepted as-is so older collections keep their identity.
pub type TaskId = String;

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities, ordered from highest to lowest as charts display them.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Pending,
    /// Work has started.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// All statuses in chart order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Completed,
        TaskStatus::Pending,
        TaskStatus::InProgress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Status reached by the toggle-complete shortcut.
    ///
    /// Only `Completed` flips back to `Pending`; `InProgress` goes forward to
    /// `Completed`, so toggling twice does not restore `InProgress`.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// Error returned when parsing an unknown enum wire value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl Display for ParseEnumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for ParseEnumError {}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                kind: "status",
                value: value.to_string(),
            }),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for task records and task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Identifier is empty.
    EmptyId,
    /// `updatedAt` is earlier than `createdAt`.
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({}) must be >= createdAt ({})",
                updated_at.to_rfc3339(),
                created_at.to_rfc3339()
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated decode shape for [`Task`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default, with = "due_date_format")]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Task {
            id: record.id,
            title: record.title,
            description: record.description,
            priority: record.priority,
            status: record.status,
            due_date: record.due_date,
            category: record.category,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        task.validate()?;
        Ok(task)
    }
}

/// User-supplied fields for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub category: String,
}

impl TaskInput {
    /// Input with the given title and default values everywhere else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Converts the full input into a patch that overwrites every field.
    ///
    /// Used when an edit form is submitted with all of its values.
    pub fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title),
            description: Some(self.description),
            priority: Some(self.priority),
            status: Some(self.status),
            due_date: Some(self.due_date),
            category: Some(self.category),
        }
    }
}

/// Partial update for an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
    pub category: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Task {
    /// Builds a new task from user input with a freshly generated id.
    ///
    /// # Errors
    /// - `EmptyTitle` when the trimmed title is empty.
    pub fn create(input: TaskInput, now: DateTime<Utc>) -> Result<Self, TaskValidationError> {
        Self::create_with_id(Uuid::new_v4().to_string(), input, now)
    }

    /// Builds a new task with a caller-provided id.
    ///
    /// Used by import paths and tests where the identity already exists.
    pub fn create_with_id(
        id: impl Into<TaskId>,
        input: TaskInput,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: id.into(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            priority: input.priority,
            status: input.status,
            due_date: input.due_date,
            category: input.category.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        task.validate()?;
        Ok(task)
    }

    /// Returns a copy of this task with `patch` merged over it.
    ///
    /// `id` and `created_at` are carried over unchanged. `updated_at` is set
    /// to `now`, clamped so it never moves backwards.
    pub fn patched(&self, patch: TaskPatch, now: DateTime<Utc>) -> Result<Self, TaskValidationError> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            next.description = description.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }
        if let Some(category) = patch.category {
            next.category = category.trim().to_string();
        }
        next.touch(now);
        next.validate()?;
        Ok(next)
    }

    /// Refreshes `updated_at`, never moving it backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }

    /// Validates record invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.updated_at < self.created_at {
            return Err(TaskValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// Wire format for `dueDate`.
///
/// Written as `YYYY-MM-DD`. Reading also accepts a full timestamp such as
/// `2024-03-10T00:00:00.000Z` and keeps only its calendar date, without any
/// time zone shift.
mod due_date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => {
                let date_part = text.split('T').next().unwrap_or(text);
                NaiveDate::parse_from_str(date_part, FORMAT)
                    .map(Some)
                    .map_err(|err| de::Error::custom(format!("invalid dueDate `{text}`: {err}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, TaskStatus};

    #[test]
    fn toggled_flips_pending_and_completed() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
    }

    #[test]
    fn enums_parse_their_wire_names() {
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!(" HIGH ".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
