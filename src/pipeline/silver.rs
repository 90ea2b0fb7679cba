//! Silver stage: cleaning and normalization
//!
//! Flattens the export's nested assignee/timestamps wrappers into flat,
//! fully-typed [`Ticket`] records. Records without an id or a parseable
//! creation timestamp are quarantined here so the core never sees
//! optional-field ambiguity beyond `resolved_at`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info};

use super::PipelineError;
use crate::ticket::{RawExport, RawIssue, Ticket};

#[derive(Debug)]
pub struct SilverOutcome {
    pub tickets: Vec<Ticket>,
    pub total_raw: usize,
    pub dropped_missing_id: usize,
    pub dropped_missing_created: usize,
}

impl SilverOutcome {
    pub fn dropped_total(&self) -> usize {
        self.dropped_missing_id + self.dropped_missing_created
    }
}

/// Normalize the raw export into typed tickets.
pub fn transform(export: &RawExport) -> SilverOutcome {
    let total_raw = export.issues.len();
    let mut tickets = Vec::with_capacity(total_raw);
    let mut dropped_missing_id = 0;
    let mut dropped_missing_created = 0;

    for raw in &export.issues {
        let Some(id) = issue_id(raw) else {
            debug!("Dropping record without an id");
            dropped_missing_id += 1;
            continue;
        };

        let created_at = raw.created_at_raw().and_then(parse_timestamp);
        let Some(created_at) = created_at else {
            debug!(ticket_id = %id, "Dropping record without a valid creation timestamp");
            dropped_missing_created += 1;
            continue;
        };

        tickets.push(Ticket {
            id,
            issue_type: raw.issue_type.clone().unwrap_or_default(),
            status: raw.status.clone().unwrap_or_default(),
            priority: raw.priority.clone().unwrap_or_default(),
            analyst: raw.analyst_name(),
            created_at,
            resolved_at: raw.resolved_at_raw().and_then(parse_timestamp),
        });
    }

    info!(
        total_raw,
        kept = tickets.len(),
        dropped = dropped_missing_id + dropped_missing_created,
        "Silver transformation complete"
    );

    SilverOutcome {
        tickets,
        total_raw,
        dropped_missing_id,
        dropped_missing_created,
    }
}

fn issue_id(raw: &RawIssue) -> Option<String> {
    match raw.id.as_ref()? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Lenient timestamp parsing for the formats trackers actually export.
/// Offset-carrying strings keep their local wall-clock component; a bare
/// date becomes midnight. Unparseable input is `None`, never an error.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Persist the silver dataset so gold and the audit can read it back.
pub async fn write_dataset(path: &Path, tickets: &[Ticket]) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PipelineError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
    }

    let json = serde_json::to_string_pretty(tickets).map_err(|source| {
        PipelineError::SerializeFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| PipelineError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// Read a previously persisted silver dataset.
pub async fn read_dataset(path: &Path) -> Result<Vec<Ticket>, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PipelineError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| PipelineError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })
}
