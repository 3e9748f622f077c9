//! Core domain types for the migration pipeline.
//!
//! This module defines the fundamental data structures used throughout the system:
//! Jira-side issues and projects on the input side, and the normalized Pivotal
//! task records produced by the transformation.

use chrono::{DateTime, Utc};
use std::fmt;

/// Normalized Pivotal task type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    /// Stories and pair stories
    Feature,
    /// Bugs and pair bugs
    Bug,
    /// Grouping issues whose summary becomes a label on member tasks
    Epic,
    /// Discussions, tasks, and sub-task variants
    Chore,
    /// Sentinel for vocabulary the fixed table does not recognize
    Unknown,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Feature => "Feature",
            TaskType::Bug => "Bug",
            TaskType::Epic => "Epic",
            TaskType::Chore => "Chore",
            TaskType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized Pivotal workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Work has begun
    Started,
    /// Resolved or awaiting deploy on the Jira side
    Accepted,
    /// Everything else, including unrecognized statuses
    Unstarted,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Started => "Started",
            TaskState::Accepted => "Accepted",
            TaskState::Unstarted => "Unstarted",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Jira issue, flattened from the REST wire shape.
///
/// Parent/epic relationships are denormalized key links, not nested
/// structures; resolution of those links happens in the transform layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Issue key, e.g. "CORE-123"
    pub key: String,
    /// Issue type name as Jira reports it, e.g. "Story", "Sub-task"
    pub issue_type: String,
    /// Workflow status name, e.g. "In Progress"
    pub status: String,
    /// One-line summary
    pub summary: String,
    /// Key of the parent issue (set on sub-task types)
    pub parent_key: Option<String>,
    /// Key of the linked epic, if any
    pub epic_key: Option<String>,
    /// Jira labels in source order
    pub labels: Vec<String>,
    /// Raw story-point estimate
    pub estimate: Option<f64>,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Resolution timestamp, when resolved
    pub resolution_date: Option<DateTime<Utc>>,
    /// Reporter display name
    pub reporter: String,
    /// Assignee identifier, when assigned
    pub assignee: Option<String>,
    /// Free-form description, when present
    pub description: Option<String>,
    /// Resolution outcome name, e.g. "Done"
    pub resolution: Option<String>,
}

impl Issue {
    /// Create an issue with the given identity fields and empty optionals
    pub fn new(
        key: impl Into<String>,
        issue_type: impl Into<String>,
        status: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            issue_type: issue_type.into(),
            status: status.into(),
            summary: summary.into(),
            parent_key: None,
            epic_key: None,
            labels: Vec::new(),
            estimate: None,
            created: Utc::now(),
            resolution_date: None,
            reporter: String::new(),
            assignee: None,
            description: None,
            resolution: None,
        }
    }
}

/// A Jira project: a title plus its full, unordered issue collection.
///
/// Parents, subtasks, and epics are all intermixed in `issues`.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub title: String,
    pub issues: Vec<Issue>,
}

/// A resolved subtask of an exportable task
#[derive(Debug, Clone, PartialEq)]
pub struct SubtaskRef {
    /// Subtask summary text
    pub summary: String,
    /// Whether the subtask's resolution outcome was "Done"
    pub completed: bool,
}

/// The canonical export unit: one row of the Pivotal import CSV.
///
/// Timestamps are pre-formatted in the configured time zone so that
/// serialization is a pure string concatenation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub title: String,
    /// Epic label (if any) first, then the issue's own labels
    pub labels: Vec<String>,
    pub task_type: TaskType,
    /// Always an integer in [0, 8]; falsy or missing raw values become 0
    pub estimate: u8,
    pub state: TaskState,
    /// RFC 3339 creation timestamp in the configured zone
    pub created_at: String,
    /// RFC 3339 resolution timestamp in the configured zone, when resolved
    pub accepted_at: Option<String>,
    pub requested_by: String,
    /// JSON-escaped single-line description embedding the backlink URL
    pub description: String,
    pub owned_by: Option<String>,
    /// At most the configured cap; extras are dropped in encounter order
    pub subtasks: Vec<SubtaskRef>,
}
