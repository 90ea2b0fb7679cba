//! Business-hours SLA computation engine
//!
//! Composes the holiday calendar with day-granularity business-hours
//! arithmetic and the per-priority threshold policy to decide, per ticket,
//! how long resolution took in business hours and whether that met the SLA.

pub mod business_hours;
pub mod evaluator;
pub mod policy;

pub use business_hours::BusinessHoursCalculator;
pub use evaluator::SlaEvaluator;
pub use policy::{SlaPolicy, SlaThresholds};
