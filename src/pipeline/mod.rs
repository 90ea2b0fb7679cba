//! Medallion pipeline stages
//!
//! Bronze ingests the raw tracker export, silver cleans and types it, gold
//! runs the SLA evaluation and aggregated reporting, and the audit checks
//! the produced layers for integrity anomalies. Stages communicate through
//! files so each one can be rerun in isolation.

pub mod audit;
pub mod bronze;
pub mod gold;
pub mod silver;

use std::path::PathBuf;
use thiserror::Error;

pub use audit::{format_audit_report, run_audit, AuditReport};
pub use bronze::ingest;
pub use gold::{GoldOutcome, GroupReport};
pub use silver::SilverOutcome;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("File {path} is not valid JSON: {source}")]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize {path}: {source}")]
    SerializeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
