//! Gold stage: SLA evaluation and aggregated reporting
//!
//! Filters the silver dataset down to terminal-status tickets, runs each
//! one through the SLA evaluator, and reduces the enriched records into
//! the per-analyst and per-issue-type reports consumed downstream.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::PipelineError;
use crate::sla::SlaEvaluator;
use crate::ticket::{EvaluatedTicket, Ticket};

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub key: String,
    pub ticket_count: usize,
    pub mean_resolution_hours: f64,
}

#[derive(Debug)]
pub struct GoldOutcome {
    pub evaluated: Vec<EvaluatedTicket>,
    /// Terminal tickets that produced no resolution hours (missing
    /// resolved_at despite a terminal status) — surfaced, not hidden.
    pub missing_hours_anomalies: usize,
    pub analyst_report: Vec<GroupReport>,
    pub issue_type_report: Vec<GroupReport>,
}

/// Files written by [`write_outputs`].
#[derive(Debug)]
pub struct GoldPaths {
    pub dataset: PathBuf,
    pub analyst_report: PathBuf,
    pub issue_type_report: PathBuf,
}

/// Evaluate every terminal-status ticket and build the aggregations.
pub async fn build(
    tickets: &[Ticket],
    evaluator: &SlaEvaluator,
    terminal_statuses: &[String],
) -> GoldOutcome {
    let terminal: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| terminal_statuses.iter().any(|s| s == &t.status))
        .collect();

    let mut evaluated = Vec::with_capacity(terminal.len());
    let mut missing_hours_anomalies = 0;
    for ticket in terminal {
        let record = evaluator.evaluate(ticket).await;
        if record.hours_resolution.is_none() {
            missing_hours_anomalies += 1;
        }
        evaluated.push(record);
    }

    if missing_hours_anomalies > 0 {
        warn!(
            count = missing_hours_anomalies,
            "Terminal tickets without computable resolution hours"
        );
    }

    let analyst_report = aggregate_by(&evaluated, |t| t.analyst.clone());
    let issue_type_report = aggregate_by(&evaluated, |t| {
        if t.issue_type.is_empty() {
            None
        } else {
            Some(t.issue_type.clone())
        }
    });

    info!(
        evaluated = evaluated.len(),
        analysts = analyst_report.len(),
        issue_types = issue_type_report.len(),
        "Gold layer built"
    );

    GoldOutcome {
        evaluated,
        missing_hours_anomalies,
        analyst_report,
        issue_type_report,
    }
}

/// Reduce evaluated tickets into (count, mean resolution hours) per key.
/// Records whose key is absent are left out of the grouping, matching how
/// the reports treat unassigned tickets; records without resolution hours
/// still count toward volume but not toward the mean.
fn aggregate_by<F>(evaluated: &[EvaluatedTicket], key_fn: F) -> Vec<GroupReport>
where
    F: Fn(&EvaluatedTicket) -> Option<String>,
{
    let mut groups: HashMap<String, (usize, f64, usize)> = HashMap::new();
    for record in evaluated {
        let Some(key) = key_fn(record) else { continue };
        let entry = groups.entry(key).or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(hours) = record.hours_resolution {
            entry.1 += hours;
            entry.2 += 1;
        }
    }

    let mut reports: Vec<GroupReport> = groups
        .into_iter()
        .map(|(key, (count, hours_sum, hours_count))| GroupReport {
            key,
            ticket_count: count,
            mean_resolution_hours: if hours_count > 0 {
                (hours_sum / hours_count as f64 * 100.0).round() / 100.0
            } else {
                0.0
            },
        })
        .collect();
    reports.sort_by(|a, b| a.key.cmp(&b.key));
    reports
}

/// Persist the gold dataset and both reports under `gold_dir`.
pub async fn write_outputs(gold_dir: &Path, outcome: &GoldOutcome) -> Result<GoldPaths, PipelineError> {
    tokio::fs::create_dir_all(gold_dir)
        .await
        .map_err(|source| PipelineError::WriteFailed {
            path: gold_dir.to_path_buf(),
            source,
        })?;

    let paths = GoldPaths {
        dataset: gold_dir.join("final_sla_report.json"),
        analyst_report: gold_dir.join("report_analyst.json"),
        issue_type_report: gold_dir.join("report_issue_type.json"),
    };

    write_json(&paths.dataset, &outcome.evaluated).await?;
    write_json(&paths.analyst_report, &outcome.analyst_report).await?;
    write_json(&paths.issue_type_report, &outcome.issue_type_report).await?;
    Ok(paths)
}

/// Read a previously persisted gold dataset.
pub async fn read_dataset(path: &Path) -> Result<Vec<EvaluatedTicket>, PipelineError> {
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

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|source| PipelineError::SerializeFailed {
            path: path.to_path_buf(),
            source,
        })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| PipelineError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
}
