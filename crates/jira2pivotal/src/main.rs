//! Jira to Pivotal Tracker migration
//!
//! Fetches issues from the Jira REST search API, normalizes them into
//! Pivotal Tracker task records, and writes one import CSV per project plus
//! a combined "All Projects.csv".

use anyhow::{bail, Result};
use clap::Parser;
use jira2pivotal::cli::Cli;
use jira2pivotal::commands::Migrator;
use jira2pivotal::config::Config;
use jira2pivotal::jira::JiraClient;
use jira2pivotal::output::OutputContext;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;

    if !cli.project.is_empty() {
        config.export.projects = cli.project.clone();
    }
    if let Some(output) = &cli.output {
        config.export.output_dir = Some(output.clone());
    }
    if let Some(columns) = cli.subtask_columns {
        config.export.subtask_columns = Some(columns);
    }

    if config.export.projects.is_empty() {
        bail!("no projects to export; configure [export] projects or pass --project");
    }

    let output = OutputContext::new(cli.quiet);
    let client = JiraClient::from_config(&config)?;

    Migrator::new(&client, &config, &output).run(cli.dry_run)
}
