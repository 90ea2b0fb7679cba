// SLA Pipeline Library - Issue-Tracker SLA Compliance Engine
// This exposes the core components for testing and integration

pub mod config;
pub mod holidays;
pub mod pipeline;
pub mod sla;
pub mod telemetry;
pub mod ticket;

// Re-export key types for easy access
pub use config::{config, init_config, SlaPipelineConfig};
pub use holidays::{HolidayApiClient, HolidayFetchError, HolidayProvider, HolidaySource};
pub use pipeline::{AuditReport, GoldOutcome, GroupReport, PipelineError, SilverOutcome};
pub use sla::{BusinessHoursCalculator, SlaEvaluator, SlaPolicy, SlaThresholds};
pub use telemetry::{create_phase_span, generate_run_id, init_telemetry};
pub use ticket::{EvaluatedTicket, Priority, RawExport, RawIssue, Ticket};
