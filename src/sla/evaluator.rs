//! Per-ticket SLA evaluation
//!
//! Composes the business-hours calculator and the threshold policy into the
//! enriched gold-layer record. Pure with respect to ticket data; the only
//! effect is the lazy holiday-calendar population behind the calculator.

use tracing::warn;

use crate::sla::business_hours::BusinessHoursCalculator;
use crate::sla::policy::SlaPolicy;
use crate::ticket::{EvaluatedTicket, Ticket};

pub struct SlaEvaluator {
    calculator: BusinessHoursCalculator,
    policy: SlaPolicy,
}

impl SlaEvaluator {
    pub fn new(calculator: BusinessHoursCalculator, policy: SlaPolicy) -> Self {
        Self { calculator, policy }
    }

    /// Evaluate one ticket.
    ///
    /// The evaluator only ever receives terminal-status tickets, so a
    /// missing resolution-hours result is a data-quality anomaly: the
    /// record is still produced (`hours_resolution = None`,
    /// `is_sla_met = false`) and the condition is logged so the run
    /// summary and the audit can surface it — flag, don't abort.
    pub async fn evaluate(&self, ticket: &Ticket) -> EvaluatedTicket {
        let hours_resolution = self
            .calculator
            .business_hours(Some(ticket.created_at), ticket.resolved_at)
            .await;
        let sla_expected = self.policy.expected_hours(ticket.priority_class());
        let is_sla_met = matches!(hours_resolution, Some(hours) if hours <= sla_expected as f64);

        if hours_resolution.is_none() {
            warn!(
                ticket_id = %ticket.id,
                status = %ticket.status,
                "Terminal ticket has no computable resolution hours"
            );
        }

        EvaluatedTicket {
            id: ticket.id.clone(),
            issue_type: ticket.issue_type.clone(),
            status: ticket.status.clone(),
            priority: ticket.priority.clone(),
            analyst: ticket.analyst.clone(),
            created_at: ticket.created_at,
            resolved_at: ticket.resolved_at,
            hours_resolution,
            sla_expected,
            is_sla_met,
        }
    }
}
