use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Initialize structured logging for a pipeline run.
/// JSON output with span context so per-phase log lines carry the run id
/// and phase name; RUST_LOG overrides the default level.
pub fn init_telemetry() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("SLA pipeline telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking one pipeline run's log lines
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span wrapping one pipeline phase
pub fn create_phase_span(phase: &str, run_id: &str) -> tracing::Span {
    tracing::info_span!(
        "pipeline_phase",
        phase = phase,
        run.id = run_id,
        otel.kind = "internal"
    )
}
