//! Jira REST client and the issue source abstraction.
//!
//! [`IssueSource`] is the seam between the pipeline and the network: the
//! real [`JiraClient`] pages through the search API, while tests substitute
//! [`InMemorySource`] with canned projects.

use crate::config::Config;
use crate::domain::{Issue, Project};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching issues. Any of these aborts the whole run;
/// there is no per-project recovery on the fetch side.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Jira returned HTTP {status} for project {project}")]
    Status { project: String, status: u16 },

    #[error("transport failure talking to Jira: {0}")]
    Transport(String),

    #[error("failed to decode Jira response")]
    Decode(#[from] std::io::Error),

    #[error("issue {key} has unparseable timestamp {value:?}")]
    Timestamp { key: String, value: String },

    #[error("no Jira credentials; set JIRA_USERNAME and JIRA_TOKEN or add them to the config file")]
    MissingCredentials,
}

/// Provider of complete projects, one per requested title.
pub trait IssueSource {
    /// Fetch the named projects, preserving the requested order.
    fn fetch_projects(&self, titles: &[String]) -> Result<Vec<Project>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<WireIssue>,
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    key: String,
    fields: WireFields,
}

#[derive(Debug, Deserialize)]
struct WireFields {
    issuetype: WireName,
    status: WireName,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    parent: Option<WireKey>,
    #[serde(default, rename = "customfield_10013")]
    epic_key: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default, rename = "customfield_10020")]
    estimate: Option<f64>,
    created: String,
    #[serde(default, rename = "resolutiondate")]
    resolution_date: Option<String>,
    #[serde(default)]
    reporter: Option<WireDisplayName>,
    #[serde(default)]
    assignee: Option<WireUserName>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    resolution: Option<WireName>,
}

#[derive(Debug, Deserialize)]
struct WireName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireKey {
    key: String,
}

#[derive(Debug, Deserialize)]
struct WireDisplayName {
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct WireUserName {
    name: String,
}

impl WireIssue {
    fn into_issue(self) -> Result<Issue, FetchError> {
        let created = parse_timestamp(&self.key, &self.fields.created)?;
        let resolution_date = self
            .fields
            .resolution_date
            .as_deref()
            .map(|value| parse_timestamp(&self.key, value))
            .transpose()?;

        Ok(Issue {
            key: self.key,
            issue_type: self.fields.issuetype.name,
            status: self.fields.status.name,
            summary: self.fields.summary,
            parent_key: self.fields.parent.map(|p| p.key),
            epic_key: self.fields.epic_key,
            labels: self.fields.labels,
            estimate: self.fields.estimate,
            created,
            resolution_date,
            reporter: self
                .fields
                .reporter
                .map(|r| r.display_name)
                .unwrap_or_default(),
            assignee: self.fields.assignee.map(|a| a.name),
            description: self.fields.description,
            resolution: self.fields.resolution.map(|r| r.name),
        })
    }
}

/// Jira emits "2019-03-04T10:00:00.000-0800": offset without a colon, which
/// strict RFC 3339 parsing rejects.
fn parse_timestamp(key: &str, value: &str) -> Result<DateTime<Utc>, FetchError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| FetchError::Timestamp {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Synchronous Jira REST client, authenticated with HTTP Basic.
pub struct JiraClient {
    host: String,
    auth_header: String,
    page_size: usize,
    max_pages: usize,
    agent: ureq::Agent,
}

impl JiraClient {
    /// Build a client from the configuration, resolving credentials through
    /// the env-then-file accessors.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let username = config.jira.username().ok_or(FetchError::MissingCredentials)?;
        let token = config.jira.token().ok_or(FetchError::MissingCredentials)?;

        let auth_header = format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", username, token))
        );

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();

        Ok(Self {
            host: config.jira.host.clone(),
            auth_header,
            page_size: config.jira.page_size(),
            max_pages: config.jira.max_pages(),
            agent,
        })
    }

    fn search_page(&self, title: &str, page: usize) -> Result<Vec<WireIssue>, FetchError> {
        let url = format!("https://{}/rest/api/2/search", self.host);
        let jql = format!("PROJECT=\"{}\" ORDER BY key ASC", title);
        let start_at = page * self.page_size;

        let response = self
            .agent
            .get(&url)
            .set("Authorization", &self.auth_header)
            .query("jql", &jql)
            .query("startAt", &start_at.to_string())
            .query("maxResults", &self.page_size.to_string())
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(status, _) => FetchError::Status {
                    project: title.to_string(),
                    status,
                },
                ureq::Error::Transport(t) => FetchError::Transport(t.to_string()),
            })?;

        let body: SearchResponse = response.into_json()?;
        Ok(body.issues)
    }
}

impl IssueSource for JiraClient {
    fn fetch_projects(&self, titles: &[String]) -> Result<Vec<Project>, FetchError> {
        let mut projects = Vec::with_capacity(titles.len());

        for title in titles {
            let mut issues = Vec::new();
            for page in 0..self.max_pages {
                let batch = self.search_page(title, page)?;
                let batch_len = batch.len();
                for wire in batch {
                    issues.push(wire.into_issue()?);
                }
                if batch_len < self.page_size {
                    break;
                }
            }
            projects.push(Project {
                title: title.clone(),
                issues,
            });
        }

        Ok(projects)
    }
}

/// Canned issue source for tests and dry runs against fixture data.
pub struct InMemorySource {
    projects: Vec<Project>,
}

impl InMemorySource {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }
}

impl IssueSource for InMemorySource {
    fn fetch_projects(&self, titles: &[String]) -> Result<Vec<Project>, FetchError> {
        Ok(titles
            .iter()
            .map(|title| {
                self.projects
                    .iter()
                    .find(|p| &p.title == title)
                    .cloned()
                    .unwrap_or_else(|| Project {
                        title: title.clone(),
                        issues: Vec::new(),
                    })
            })
            .collect())
    }
}
