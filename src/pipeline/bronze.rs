//! Bronze stage: raw export ingestion
//!
//! Reads the issue-tracker export file and validates it parses as the
//! expected JSON document. No cleaning happens here; the point of the
//! stage is knowing the raw data is readable before anything downstream
//! touches it.

use std::path::Path;
use tracing::info;

use super::PipelineError;
use crate::ticket::RawExport;

/// Read and parse the raw export at `path`.
pub async fn ingest(path: &Path) -> Result<RawExport, PipelineError> {
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

    let export: RawExport =
        serde_json::from_str(&contents).map_err(|source| PipelineError::MalformedJson {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        path = %path.display(),
        records = export.issues.len(),
        "Raw export ingested"
    );
    Ok(export)
}
