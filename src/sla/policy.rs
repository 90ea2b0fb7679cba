//! SLA threshold policy
//!
//! Maps a ticket's priority class to its expected-resolution threshold in
//! business hours. Total over every input: unknown labels get the
//! configurable default threshold instead of an error.

use serde::{Deserialize, Serialize};

use crate::ticket::Priority;

/// Threshold table, in business hours. `default_hours` applies to any
/// priority outside High/Medium/Low; it ships at the most lenient value
/// (120h) so unknown-priority tickets are not spuriously flagged as
/// violations, and deployments preferring the strict interpretation can
/// set it to 0 in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaThresholds {
    pub high_hours: u32,
    pub medium_hours: u32,
    pub low_hours: u32,
    pub default_hours: u32,
}

impl Default for SlaThresholds {
    fn default() -> Self {
        Self {
            high_hours: 24,
            medium_hours: 72,
            low_hours: 120,
            default_hours: 120,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlaPolicy {
    thresholds: SlaThresholds,
}

impl SlaPolicy {
    pub fn new(thresholds: SlaThresholds) -> Self {
        Self { thresholds }
    }

    /// Expected resolution threshold for a priority class.
    pub fn expected_hours(&self, priority: Priority) -> u32 {
        match priority {
            Priority::High => self.thresholds.high_hours,
            Priority::Medium => self.thresholds.medium_hours,
            Priority::Low => self.thresholds.low_hours,
            Priority::Unspecified => self.thresholds.default_hours,
        }
    }

    /// Expected resolution threshold straight from a raw priority label.
    pub fn expected_hours_for_label(&self, label: &str) -> u32 {
        let priority = Priority::from_label(label);
        if priority == Priority::Unspecified && !label.is_empty() {
            tracing::debug!(label, "Unknown priority label, using default threshold");
        }
        self.expected_hours(priority)
    }
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self::new(SlaThresholds::default())
    }
}
