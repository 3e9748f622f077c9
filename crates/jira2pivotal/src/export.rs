//! CSV row serializer and project aggregator.
//!
//! The downstream importer expects a rectangular table: every row carries the
//! ten schema fields plus exactly N "Task,Task Status" column pairs, with
//! unused pairs emitted as empty fields rather than omitted. Serialization is
//! deterministic; the same record sequence always yields byte-identical text.

use crate::domain::TaskRecord;

/// The fixed Pivotal import schema, in emission order.
pub const PIVOTAL_FIELDS: [&str; 10] = [
    "Title",
    "Labels",
    "Type",
    "Estimate",
    "Current State",
    "Created at",
    "Accepted at",
    "Requested by",
    "Description",
    "Owned By",
];

/// Serialize an ordered record sequence into one CSV document.
///
/// Output is a header line plus one line per record, newline-joined with no
/// trailing newline.
pub fn to_csv(records: &[TaskRecord], subtask_cap: usize) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header(subtask_cap));
    for record in records {
        lines.push(row(record, subtask_cap));
    }
    lines.join("\n")
}

/// Merge already-serialized per-project documents into one document with a
/// single shared header.
///
/// Each project's own header is stripped; its data rows follow in their
/// original order, project after project. Nothing is re-sorted or
/// de-duplicated: a task present in two projects appears twice.
pub fn combine(documents: &[(String, String)], subtask_cap: usize) -> String {
    let mut lines = vec![header(subtask_cap)];
    for (_, csv) in documents {
        // split_once keeps any quoted newlines inside data rows intact.
        if let Some((_, rows)) = csv.split_once('\n') {
            if !rows.is_empty() {
                lines.push(rows.to_string());
            }
        }
    }
    lines.join("\n")
}

fn header(subtask_cap: usize) -> String {
    let mut line = PIVOTAL_FIELDS.join(",");
    for _ in 0..subtask_cap {
        line.push_str(",Task,Task Status");
    }
    line
}

fn row(record: &TaskRecord, subtask_cap: usize) -> String {
    let mut fields: Vec<String> = vec![
        escape(&record.title),
        escape(&record.labels.join(",")),
        record.task_type.as_str().to_string(),
        record.estimate.to_string(),
        record.state.as_str().to_string(),
        escape(&record.created_at),
        record.accepted_at.as_deref().map(escape).unwrap_or_default(),
        escape(&record.requested_by),
        escape(&record.description),
        record.owned_by.as_deref().map(escape).unwrap_or_default(),
    ];

    for subtask in record.subtasks.iter().take(subtask_cap) {
        fields.push(escape(&subtask.summary));
        fields.push(
            if subtask.completed {
                "Completed"
            } else {
                "Not Completed"
            }
            .to_string(),
        );
    }

    let used = record.subtasks.len().min(subtask_cap);
    for _ in used..subtask_cap {
        fields.push(String::new());
        fields.push(String::new());
    }

    fields.join(",")
}

/// Quote a field when it contains the delimiter, a quote, or a line break,
/// doubling embedded quotes per RFC 4180.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
