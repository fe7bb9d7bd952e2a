//! Core types for the task-tracking backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Column value as stored in the tasks table.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a stored column value. The CHECK constraint keeps the column
    /// within the three known values; anything else falls back to medium.
    pub fn from_column(s: &str) -> Self {
        match s {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }

    /// Parse a client-supplied value. Unknown values are a validation
    /// error for the caller to raise, not a silent fallback.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// A task enriched with its full tag and subtask sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,

    // Children, always the current full sets from the store
    pub tags: Vec<String>,
    pub subtasks: Vec<Subtask>,
}

/// A checklist item belonging to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// Subtask entry as accepted in write payloads: either plain text or a
/// structure carrying its own completed flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubtaskInput {
    Text(String),
    Detailed {
        text: String,
        #[serde(default)]
        completed: bool,
    },
}

impl SubtaskInput {
    pub fn text(&self) -> &str {
        match self {
            SubtaskInput::Text(text) => text,
            SubtaskInput::Detailed { text, .. } => text,
        }
    }

    pub fn completed(&self) -> bool {
        match self {
            SubtaskInput::Text(_) => false,
            SubtaskInput::Detailed { completed, .. } => *completed,
        }
    }
}

/// Fields for creating a task. Missing optionals take their defaults.
///
/// Title and priority stay loose here so that absence or a bad value
/// reaches the repository, which raises a structured validation error
/// instead of the extractor rejecting the body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
    pub subtasks: Option<Vec<SubtaskInput>>,
}

/// Fields for updating a task. Every scalar column is rewritten, not
/// merged: optionals absent from the payload reset to their defaults.
/// Title and priority are validated by the repository, as in [`NewTask`].
#[derive(Debug, Clone, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub tags: Option<Vec<String>>,
    pub subtasks: Option<Vec<SubtaskInput>>,
}

/// Aggregate task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: i64,
    pub completed: i64,
    pub active: i64,
    pub overdue: i64,
}
