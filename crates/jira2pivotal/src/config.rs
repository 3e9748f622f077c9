//! Configuration file loading and parsing.
//!
//! The tool reads `jira2pivotal.toml` (or the path given via `--config`).
//! Optional fields fall back through accessor methods; credentials can be
//! supplied through `JIRA_USERNAME` / `JIRA_TOKEN` environment variables,
//! which take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Root configuration structure loaded from `jira2pivotal.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Jira connection and pagination settings.
    pub jira: JiraConfig,
    /// Export selection and CSV shaping settings.
    pub export: ExportConfig,
}

/// Jira connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
    /// Jira host, without scheme (e.g. "example.atlassian.net").
    pub host: String,
    /// Account username; `JIRA_USERNAME` overrides.
    pub username: Option<String>,
    /// API token or password; `JIRA_TOKEN` overrides.
    pub token: Option<String>,
    /// Issues requested per search page (default: 50).
    pub page_size: Option<usize>,
    /// Maximum pages fetched per project (default: 6).
    pub max_pages: Option<usize>,
}

impl JiraConfig {
    /// Effective username: env var first, then the config file.
    pub fn username(&self) -> Option<String> {
        env::var("JIRA_USERNAME").ok().or_else(|| self.username.clone())
    }

    /// Effective token: env var first, then the config file.
    pub fn token(&self) -> Option<String> {
        env::var("JIRA_TOKEN").ok().or_else(|| self.token.clone())
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(50)
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages.unwrap_or(6)
    }
}

/// Export selection and CSV shaping settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Project titles to export; their order is the output order.
    pub projects: Vec<String>,
    /// Subtask column pairs reserved per row (default: 10).
    pub subtask_columns: Option<usize>,
    /// IANA time zone for exported timestamps (default: "America/Los_Angeles").
    pub timezone: Option<String>,
    /// Directory receiving the CSV files (default: "projects").
    pub output_dir: Option<String>,
}

impl ExportConfig {
    pub fn subtask_columns(&self) -> usize {
        self.subtask_columns.unwrap_or(10)
    }

    pub fn timezone(&self) -> String {
        self.timezone
            .clone()
            .unwrap_or_else(|| "America/Los_Angeles".to_string())
    }

    pub fn output_dir(&self) -> String {
        self.output_dir
            .clone()
            .unwrap_or_else(|| "projects".to_string())
    }
}

impl Config {
    /// Load configuration from the given path.
    ///
    /// A missing file or malformed TOML is an error naming the path; there
    /// is no usable default for the Jira host or the project list.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn minimal_toml() -> &'static str {
        r#"
[jira]
host = "example.atlassian.net"

[export]
projects = ["CORE"]
"#
    }

    #[test]
    fn parse_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.jira.host, "example.atlassian.net");
        assert_eq!(config.jira.page_size(), 50);
        assert_eq!(config.jira.max_pages(), 6);
        assert_eq!(config.export.subtask_columns(), 10);
        assert_eq!(config.export.timezone(), "America/Los_Angeles");
        assert_eq!(config.export.output_dir(), "projects");
    }

    #[test]
    fn parse_full_config() {
        let config_toml = r#"
[jira]
host = "example.atlassian.net"
username = "user@example.com"
token = "secret"
page_size = 25
max_pages = 3

[export]
projects = ["CORE", "WEB"]
subtask_columns = 5
timezone = "Europe/Berlin"
output_dir = "out"
"#;
        let config: Config = toml::from_str(config_toml).unwrap();
        assert_eq!(config.jira.page_size(), 25);
        assert_eq!(config.jira.max_pages(), 3);
        assert_eq!(config.export.projects, vec!["CORE", "WEB"]);
        assert_eq!(config.export.subtask_columns(), 5);
        assert_eq!(config.export.timezone(), "Europe/Berlin");
        assert_eq!(config.export.output_dir(), "out");
    }

    #[test]
    fn missing_host_is_an_error() {
        let config_toml = r#"
[jira]

[export]
projects = ["CORE"]
"#;
        assert!(toml::from_str::<Config>(config_toml).is_err());
    }

    #[test]
    fn load_missing_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.toml");
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.toml"));
    }

    #[test]
    fn load_malformed_toml_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "[broken syntax").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn env_overrides_file_credentials() {
        let config: Config = toml::from_str(
            r#"
[jira]
host = "example.atlassian.net"
username = "file-user"
token = "file-token"

[export]
projects = ["CORE"]
"#,
        )
        .unwrap();

        env::set_var("JIRA_USERNAME", "env-user");
        assert_eq!(config.jira.username(), Some("env-user".to_string()));
        env::remove_var("JIRA_USERNAME");

        assert_eq!(config.jira.username(), Some("file-user".to_string()));
        assert_eq!(config.jira.token(), Some("file-token".to_string()));
    }
}
