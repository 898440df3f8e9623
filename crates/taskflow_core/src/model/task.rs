//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, view and persistence.
//! - Own the wire shape of the persisted slot (camelCase JSON fields).
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is trimmed and non-empty for every task held by the store.
//! - `created_at` is assigned once at creation and never rewritten.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque stable identifier of one task.
///
/// Newly created tasks get a UUID v4 string. Identifiers loaded from an
/// existing slot are kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Fixed category set a task can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Health,
    Study,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Work,
        Self::Personal,
        Self::Shopping,
        Self::Health,
        Self::Study,
    ];

    /// Stable wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Shopping => "shopping",
            Self::Health => "health",
            Self::Study => "study",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Study => "Study",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "work" => Ok(Self::Work),
            "personal" => Ok(Self::Personal),
            "shopping" => Ok(Self::Shopping),
            "health" => Ok(Self::Health),
            "study" => Ok(Self::Study),
            other => Err(UnknownValueError::new("category", other)),
        }
    }
}

/// Task urgency. Declaration order is the urgency order used for sorting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    /// Stable wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(UnknownValueError::new("priority", other)),
        }
    }
}

/// Returned when a string does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValueError {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl Display for UnknownValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} value `{}`", self.kind, self.value)
    }
}

impl Error for UnknownValueError {}

/// Validation errors for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::EmptyText => write!(f, "task text must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// The sole domain entity: one to-do item.
///
/// Serialized with the slot's camelCase field names. Unset `category` and
/// `due_date` are written as empty strings; on read an empty string, `null`
/// and an absent field all decode to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default, with = "blank_as_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "blank_as_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a pending task with a fresh id, stamped with the current time.
    ///
    /// Text is trimmed; blank text is rejected.
    pub fn new(
        text: &str,
        category: Option<Category>,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, TaskValidationError> {
        let text = normalize_text(text)?;
        Ok(Self {
            id: TaskId::generate(),
            text,
            category,
            priority,
            due_date,
            completed: false,
            created_at: Utc::now(),
        })
    }

    /// Checks record-level invariants, used on every loaded record.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Trims task text and rejects blank input.
pub fn normalize_text(text: &str) -> Result<String, TaskValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

mod blank_as_none {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_text, Category, Priority, Task, TaskValidationError};

    #[test]
    fn new_task_trims_text_and_sets_defaults() {
        let task = Task::new("  water plants ", None, Priority::default(), None)
            .expect("valid text should build a task");
        assert_eq!(task.text, "water plants");
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.completed);
        assert!(!task.id.as_str().is_empty());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(normalize_text(" \t\n"), Err(TaskValidationError::EmptyText));
    }

    #[test]
    fn generated_ids_differ() {
        let first = Task::new("a", None, Priority::Low, None).expect("task a");
        let second = Task::new("b", None, Priority::Low, None).expect("task b");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn category_parse_rejects_unknown_values() {
        assert_eq!("study".parse::<Category>(), Ok(Category::Study));
        let err = "errands".parse::<Category>().expect_err("unknown category");
        assert_eq!(err.kind, "category");
        assert_eq!(err.value, "errands");
    }

    #[test]
    fn priority_order_is_most_urgent_first() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }
}
