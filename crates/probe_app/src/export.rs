use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use probe_core::{ResultRowView, SinkView};
use serde_json::json;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::cli::ExportFormat;

const TSV_HEADER: [&str; 6] = ["Id", "Target", "URL", "State", "Title", "Content"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn default_filename(format: ExportFormat, unix_seconds: i64) -> String {
    format!("results_{unix_seconds}.{}", format.extension())
}

/// Run duration as `hh:mm:ss`. Hours keep growing past 99.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

pub fn render(
    view: &SinkView,
    format: ExportFormat,
    elapsed: Duration,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Tsv => Ok(render_tsv(&view.rows)),
        ExportFormat::Json => render_json(view, elapsed),
    }
}

/// One header line plus one line per row, in id order. Tabs and line breaks
/// inside cells are flattened to spaces so every row stays on one line.
pub fn render_tsv(rows: &[ResultRowView]) -> String {
    let mut buffer = TSV_HEADER.join("\t");
    buffer.push('\n');
    for row in rows {
        let cells = [
            row.id.to_string(),
            flatten(&row.target),
            flatten(&row.url),
            row.state.clone(),
            flatten(&row.title),
            flatten(&row.content),
        ];
        buffer.push_str(&cells.join("\t"));
        buffer.push('\n');
    }
    buffer
}

fn render_json(view: &SinkView, elapsed: Duration) -> Result<String, ExportError> {
    let document = json!({
        "completed": view.completed,
        "expected": view.expected,
        "outcome": view.outcome.as_ref().map(ToString::to_string),
        "elapsed": format_elapsed(elapsed),
        "elapsed_ms": u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "counts": {
            "stable": view.counts.stable,
            "unstable": view.counts.unstable,
            "unreachable": view.counts.unreachable,
        },
        "results": view.rows.iter().map(|row| {
            json!({
                "id": row.id,
                "target": row.target,
                "url": row.url,
                "state": row.state,
                "title": row.title,
                "content": row.content,
            })
        }).collect::<Vec<_>>(),
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

fn flatten(cell: &str) -> String {
    cell.replace(['\t', '\r', '\n'], " ")
}

/// Write `content` to `path` through a temp file in the same directory, so a
/// reader never sees a half-written export.
pub fn write_atomic(path: &Path, content: &str) -> Result<PathBuf, ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;
    Ok(path.to_path_buf())
}
