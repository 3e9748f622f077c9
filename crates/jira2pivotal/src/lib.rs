//! Jira to Pivotal Tracker Migration Library
//!
//! This library provides the full migration pipeline: fetching issues from
//! Jira, normalizing them into Pivotal task records, and serializing them as
//! import CSVs. The binary is a thin wrapper; tests drive the same code
//! through [`jira::InMemorySource`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod export;
pub mod jira;
pub mod normalize;
pub mod output;
pub mod transform;

// Re-export commonly used types
pub use commands::Migrator;
pub use config::Config;
pub use domain::{Issue, Project, SubtaskRef, TaskRecord, TaskState, TaskType};
pub use jira::{FetchError, InMemorySource, IssueSource, JiraClient};
pub use output::OutputContext;
pub use transform::TransformOptions;
