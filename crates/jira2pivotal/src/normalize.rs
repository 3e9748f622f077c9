//! Vocabulary normalization between Jira and Pivotal.
//!
//! Both functions are total: every input maps to a value, with unrecognized
//! names coerced to a sentinel. Downstream import tooling is expected to
//! tolerate or flag the sentinels; nothing here errors or logs.

use crate::domain::{TaskState, TaskType};

/// Issue type names that are never exported as task records in their own
/// right; they surface only as subtask columns of their parent.
pub const SUBTASK_TYPES: [&str; 2] = ["Sub-task", "Pair Sub-task"];

/// Whether the given Jira issue type name is a subtask type (exact match)
pub fn is_subtask_type(name: &str) -> bool {
    SUBTASK_TYPES.contains(&name)
}

/// Map a Jira issue type name to the Pivotal task type.
///
/// Matching is case-insensitive against a fixed table.
pub fn normalize_issue_type(name: &str) -> TaskType {
    match name.to_lowercase().as_str() {
        "story" | "pair story" => TaskType::Feature,
        "bug" | "pair bug" => TaskType::Bug,
        "epic" => TaskType::Epic,
        "discussion" | "task" | "pair task" | "sub-task" | "pair sub-task" => TaskType::Chore,
        _ => TaskType::Unknown,
    }
}

/// Map a Jira workflow status name to the Pivotal state.
///
/// Matching is case-sensitive; anything outside the table is Unstarted.
pub fn normalize_state(status: &str) -> TaskState {
    match status {
        "In Progress" => TaskState::Started,
        "Closed" | "Done" | "Ready to Review" | "Ready to Deploy" => TaskState::Accepted,
        _ => TaskState::Unstarted,
    }
}
