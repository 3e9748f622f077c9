//! Migration run orchestration.
//!
//! Fetch failures abort the run; write failures are reported per file and the
//! run continues, so one unwritable project does not lose the others.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::export;
use crate::jira::IssueSource;
use crate::output::OutputContext;
use crate::transform::{build_task_records, TransformOptions};

/// Drives a full migration: fetch, transform, serialize, write.
pub struct Migrator<'a, S: IssueSource> {
    source: &'a S,
    config: &'a Config,
    output: &'a OutputContext,
}

impl<'a, S: IssueSource> Migrator<'a, S> {
    pub fn new(source: &'a S, config: &'a Config, output: &'a OutputContext) -> Self {
        Self {
            source,
            config,
            output,
        }
    }

    /// Run the migration end to end.
    ///
    /// With `dry_run` the combined document is printed to stdout and nothing
    /// touches the filesystem.
    pub fn run(&self, dry_run: bool) -> Result<()> {
        let options = TransformOptions::from_config(self.config)?;
        let cap = self.config.export.subtask_columns();
        let titles = &self.config.export.projects;

        let _ = self
            .output
            .print_info(format!("Fetching {} project(s) from {}", titles.len(), self.config.jira.host));

        let projects = self.source.fetch_projects(titles)?;

        let documents: Vec<(String, String)> = projects
            .iter()
            .map(|project| {
                let records = build_task_records(project, &options);
                if project.issues.is_empty() {
                    let _ = self
                        .output
                        .print_warning(format!("{}: no issues fetched", project.title));
                }
                let _ = self.output.print_info(format!(
                    "{}: {} task(s) from {} issue(s)",
                    project.title,
                    records.len(),
                    project.issues.len()
                ));
                (project.title.clone(), export::to_csv(&records, cap))
            })
            .collect();

        let combined = export::combine(&documents, cap);

        if dry_run {
            println!("{}", combined);
            return Ok(());
        }

        let out_dir = self.config.export.output_dir();
        let out_dir = Path::new(&out_dir);
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

        let mut written = 0usize;

        for (title, csv) in &documents {
            let path = out_dir.join(format!("{}.csv", title));
            match fs::write(&path, csv) {
                Ok(()) => written += 1,
                Err(e) => {
                    let _ = self
                        .output
                        .print_error(format!("failed to write {}: {}", path.display(), e));
                }
            }
        }

        let combined_path = out_dir.join("All Projects.csv");
        match fs::write(&combined_path, &combined) {
            Ok(()) => written += 1,
            Err(e) => {
                let _ = self
                    .output
                    .print_error(format!("failed to write {}: {}", combined_path.display(), e));
            }
        }

        let _ = self.output.print_success(format!(
            "Wrote {} file(s) to {}",
            written,
            out_dir.display()
        ));

        Ok(())
    }
}
