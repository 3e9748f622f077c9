//! End-to-end pipeline tests driving the migrator against canned projects.

use chrono::{TimeZone, Utc};
use jira2pivotal::{Config, InMemorySource, Issue, Migrator, OutputContext, Project};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config_for(out_dir: &Path, projects: &[&str]) -> Config {
    let toml = format!(
        r#"
[jira]
host = "jira.example.com"

[export]
projects = [{}]
output_dir = "{}"
"#,
        projects
            .iter()
            .map(|p| format!("\"{}\"", p))
            .collect::<Vec<_>>()
            .join(", "),
        out_dir.display()
    );
    toml::from_str(&toml).unwrap()
}

fn issue(key: &str, issue_type: &str, status: &str, summary: &str) -> Issue {
    let mut issue = Issue::new(key, issue_type, status, summary);
    issue.created = Utc.with_ymd_and_hms(2019, 3, 4, 18, 0, 0).unwrap();
    issue.reporter = "Alice".to_string();
    issue
}

fn run(source: &InMemorySource, config: &Config) {
    let output = OutputContext::new(true);
    Migrator::new(source, config, &output).run(false).unwrap();
}

#[test]
fn full_pipeline_exports_story_with_subtasks() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let config = config_for(&out_dir, &["CORE"]);

    let mut story = issue("CORE-1", "Story", "In Progress", "Checkout flow");
    story.estimate = Some(3.0);
    story.assignee = Some("bob".to_string());

    let mut done_sub = issue("CORE-2", "Sub-task", "Closed", "Write tests");
    done_sub.parent_key = Some("CORE-1".to_string());
    done_sub.resolution = Some("Done".to_string());

    let mut open_sub = issue("CORE-3", "Pair Sub-task", "Open", "Review copy");
    open_sub.parent_key = Some("CORE-1".to_string());

    let source = InMemorySource::new(vec![Project {
        title: "CORE".to_string(),
        issues: vec![story, done_sub, open_sub],
    }]);

    run(&source, &config);

    let csv = fs::read_to_string(out_dir.join("CORE.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2, "subtasks must not get their own rows");

    let row = lines[1];
    assert!(row.starts_with("Checkout flow,,Feature,3,Started,2019-03-04T10:00:00-08:00,,Alice,"));
    assert!(row.contains(",bob,Write tests,Completed,Review copy,Not Completed,"));
}

#[test]
fn epic_summary_becomes_leading_label() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let config = config_for(&out_dir, &["CORE"]);

    let mut epic = issue("CORE-100", "Epic", "Open", "Payment Flow");
    epic.epic_key = Some("CORE-100".to_string());

    let mut story = issue("CORE-7", "Story", "Open", "Add refunds");
    story.epic_key = Some("CORE-100".to_string());
    story.labels = vec!["backend".to_string()];

    let source = InMemorySource::new(vec![Project {
        title: "CORE".to_string(),
        issues: vec![epic, story],
    }]);

    run(&source, &config);

    let csv = fs::read_to_string(out_dir.join("CORE.csv")).unwrap();
    let story_row = csv
        .lines()
        .find(|l| l.starts_with("Add refunds,"))
        .unwrap();
    assert!(story_row.contains("\"payment flow,backend\""));
}

#[test]
fn combined_file_shares_one_header_across_projects() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let config = config_for(&out_dir, &["CORE", "WEB"]);

    let source = InMemorySource::new(vec![
        Project {
            title: "CORE".to_string(),
            issues: vec![issue("CORE-1", "Story", "Open", "Core task")],
        },
        Project {
            title: "WEB".to_string(),
            issues: vec![issue("WEB-1", "Bug", "Open", "Web task")],
        },
    ]);

    run(&source, &config);

    let combined = fs::read_to_string(out_dir.join("All Projects.csv")).unwrap();
    let lines: Vec<&str> = combined.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Title,Labels,Type,"));
    assert!(lines[1].starts_with("Core task,"));
    assert!(lines[2].starts_with("Web task,"));

    let per_project = fs::read_to_string(out_dir.join("WEB.csv")).unwrap();
    assert_eq!(per_project.lines().next(), combined.lines().next());
}

#[test]
fn resolved_bug_gets_accepted_timestamp_and_clamped_estimate() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let config = config_for(&out_dir, &["CORE"]);

    let mut bug = issue("CORE-9", "Bug", "Ready to Review", "Crash on submit");
    bug.estimate = Some(13.0);
    bug.resolution_date = Some(Utc.with_ymd_and_hms(2019, 7, 4, 18, 0, 0).unwrap());

    let source = InMemorySource::new(vec![Project {
        title: "CORE".to_string(),
        issues: vec![bug],
    }]);

    run(&source, &config);

    let csv = fs::read_to_string(out_dir.join("CORE.csv")).unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with(
        "Crash on submit,,Bug,8,Accepted,2019-03-04T10:00:00-08:00,2019-07-04T11:00:00-07:00,Alice,"
    ));
}

#[test]
fn description_embeds_backlink_to_source_ticket() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let config = config_for(&out_dir, &["CORE"]);

    let mut story = issue("CORE-5", "Story", "Open", "Add search");
    story.description = Some("Full text search".to_string());

    let source = InMemorySource::new(vec![Project {
        title: "CORE".to_string(),
        issues: vec![story],
    }]);

    run(&source, &config);

    let csv = fs::read_to_string(out_dir.join("CORE.csv")).unwrap();
    assert!(csv.contains("Original Jira Ticket: https://jira.example.com/browse/CORE-5"));
    // The JSON-escaped description keeps the row on one physical line.
    assert_eq!(csv.lines().count(), 2);
}

#[test]
fn missing_project_still_yields_a_header_only_file() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let config = config_for(&out_dir, &["GONE"]);

    let source = InMemorySource::new(Vec::new());
    run(&source, &config);

    let csv = fs::read_to_string(out_dir.join("GONE.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1);

    let combined = fs::read_to_string(out_dir.join("All Projects.csv")).unwrap();
    assert_eq!(combined.lines().count(), 1);
}

#[test]
fn every_exported_row_has_a_fixed_column_count() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let config = config_for(&out_dir, &["CORE"]);

    let mut parent = issue("CORE-1", "Task", "Open", "Parent");
    parent.description = Some("multi\nline".to_string());
    let mut sub = issue("CORE-2", "Sub-task", "Open", "Child, with comma");
    sub.parent_key = Some("CORE-1".to_string());

    let source = InMemorySource::new(vec![Project {
        title: "CORE".to_string(),
        issues: vec![parent, sub, issue("CORE-3", "Incident", "Weird", "Odd one")],
    }]);

    run(&source, &config);

    let csv = fs::read_to_string(out_dir.join("CORE.csv")).unwrap();
    for line in csv.lines() {
        let mut in_quotes = false;
        let commas = line
            .chars()
            .filter(|&c| {
                if c == '"' {
                    in_quotes = !in_quotes;
                }
                c == ',' && !in_quotes
            })
            .count();
        assert_eq!(commas, 29, "line: {}", line);
    }

    // Unrecognized vocabulary is coerced, not dropped.
    assert!(csv.contains("Odd one,,Unknown,0,Unstarted,"));
}
