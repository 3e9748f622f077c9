//! Command-line interface definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Jira to Pivotal Tracker migration
///
/// Fetches the configured Jira projects, converts their issues to Pivotal
/// Tracker task records, and writes one import CSV per project plus a
/// combined "All Projects.csv".
#[derive(Parser)]
#[command(name = "jira2pivotal")]
#[command(about = "Export Jira projects as Pivotal Tracker import CSVs", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "jira2pivotal.toml")]
    pub config: PathBuf,

    /// Project titles to export, overriding the configured list
    #[arg(short, long)]
    pub project: Vec<String>,

    /// Output directory, overriding the configured one
    #[arg(short, long)]
    pub output: Option<String>,

    /// Subtask column pairs per row, overriding the configured count
    #[arg(long)]
    pub subtask_columns: Option<usize>,

    /// Print the combined CSV to stdout instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress non-essential output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}
