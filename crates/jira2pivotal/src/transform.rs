//! Task record builder: one Jira project in, ordered Pivotal task records out.
//!
//! Parent/epic links in the source data are denormalized key references, so
//! the builder constructs two indices once per project (parent key to child
//! subtasks, key to issue) and then makes a single ordered pass over the
//! non-subtask issues. Missing optional fields (epic, description, assignee,
//! resolution) never fail a record; one malformed issue never aborts the
//! project.

use anyhow::{anyhow, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

use crate::config::Config;
use crate::domain::{Issue, Project, SubtaskRef, TaskRecord};
use crate::normalize::{is_subtask_type, normalize_issue_type, normalize_state};

/// Resolved per-run options for the transformation, passed explicitly so
/// the builder never reads process-wide state.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Subtask column pairs reserved per row (N).
    pub subtask_cap: usize,
    /// Target time zone for exported timestamps.
    pub timezone: Tz,
    /// Base URL for description backlinks, e.g. "https://example.atlassian.net".
    pub browse_base: String,
}

impl TransformOptions {
    /// Resolve options from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let name = config.export.timezone();
        let timezone: Tz = name
            .parse()
            .map_err(|_| anyhow!("unknown time zone: {}", name))?;

        Ok(Self {
            subtask_cap: config.export.subtask_columns(),
            timezone,
            browse_base: format!("https://{}", config.jira.host),
        })
    }
}

/// Build one task record per non-subtask issue, in source order.
pub fn build_task_records(project: &Project, opts: &TransformOptions) -> Vec<TaskRecord> {
    let mut by_key: HashMap<&str, &Issue> = HashMap::new();
    let mut children: HashMap<&str, Vec<&Issue>> = HashMap::new();

    for issue in &project.issues {
        by_key.insert(issue.key.as_str(), issue);
        if is_subtask_type(&issue.issue_type) {
            if let Some(parent) = &issue.parent_key {
                children.entry(parent.as_str()).or_default().push(issue);
            }
        }
    }

    project
        .issues
        .iter()
        .filter(|issue| !is_subtask_type(&issue.issue_type))
        .map(|issue| build_record(issue, &by_key, &children, opts))
        .collect()
}

fn build_record(
    issue: &Issue,
    by_key: &HashMap<&str, &Issue>,
    children: &HashMap<&str, Vec<&Issue>>,
    opts: &TransformOptions,
) -> TaskRecord {
    let subtasks: Vec<SubtaskRef> = children
        .get(issue.key.as_str())
        .map(|subs| {
            subs.iter()
                .take(opts.subtask_cap)
                .map(|sub| SubtaskRef {
                    summary: sub.summary.clone(),
                    completed: sub.resolution.as_deref() == Some("Done"),
                })
                .collect()
        })
        .unwrap_or_default();

    // An epic link pointing at a missing or non-Epic issue contributes nothing.
    let epic = issue
        .epic_key
        .as_deref()
        .and_then(|key| by_key.get(key))
        .filter(|candidate| candidate.issue_type == "Epic");

    let mut labels = Vec::with_capacity(issue.labels.len() + 1);
    if let Some(epic) = epic {
        labels.push(epic.summary.to_lowercase());
    }
    labels.extend(issue.labels.iter().cloned());

    TaskRecord {
        title: issue.summary.clone(),
        labels,
        task_type: normalize_issue_type(&issue.issue_type),
        estimate: clamp_estimate(issue.estimate),
        state: normalize_state(&issue.status),
        created_at: format_timestamp(issue.created, opts.timezone),
        accepted_at: issue
            .resolution_date
            .map(|ts| format_timestamp(ts, opts.timezone)),
        requested_by: issue.reporter.clone(),
        description: description_field(issue, &opts.browse_base),
        owned_by: issue.assignee.clone(),
        subtasks,
    }
}

/// Clamp a raw story-point value into an integer in [0, 8].
///
/// Missing, zero, and negative values all normalize to 0; there is no way
/// to tell "explicitly estimated at 0" from "unestimated" downstream.
pub fn clamp_estimate(raw: Option<f64>) -> u8 {
    match raw {
        Some(value) if value > 0.0 => value.min(8.0) as u8,
        _ => 0,
    }
}

fn format_timestamp(ts: DateTime<Utc>, timezone: Tz) -> String {
    ts.with_timezone(&timezone)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// JSON-escape the description together with a backlink to the source issue,
/// collapsing it to a single CSV-safe line. An absent description becomes
/// an empty body, never an error.
fn description_field(issue: &Issue, browse_base: &str) -> String {
    let body = issue.description.as_deref().unwrap_or("");
    let full = format!(
        "{}\n\nOriginal Jira Ticket: {}/browse/{}",
        body, browse_base, issue.key
    );
    serde_json::to_string(&full).unwrap_or_default()
}
