//! Data-quality audit
//!
//! Reads the three persisted layers back and checks them for integrity
//! anomalies: layer volumetrics, SLA threshold rule conformance per
//! priority, missing values in the gold dataset, and chronology
//! violations (resolution recorded before creation). Findings are
//! user-visible warnings, never fatal.

use std::path::Path;

use super::{bronze, gold, silver, PipelineError};
use crate::sla::SlaPolicy;

#[derive(Debug)]
pub struct AuditReport {
    pub bronze_records: usize,
    pub silver_records: usize,
    pub gold_records: usize,
    /// Priority labels whose stored `sla_expected` disagrees with the
    /// policy table.
    pub priority_rule_violations: Vec<String>,
    /// Gold records with no computable resolution hours.
    pub missing_hours_records: usize,
    /// Gold records with no analyst.
    pub missing_analyst_records: usize,
    /// Gold records whose resolution predates their creation.
    pub chronology_violations: usize,
}

impl AuditReport {
    pub fn is_healthy(&self) -> bool {
        self.priority_rule_violations.is_empty()
            && self.missing_hours_records == 0
            && self.missing_analyst_records == 0
            && self.chronology_violations == 0
    }
}

/// Audit the persisted layers.
pub async fn run_audit(
    bronze_path: &Path,
    silver_path: &Path,
    gold_dataset_path: &Path,
    policy: &SlaPolicy,
) -> Result<AuditReport, PipelineError> {
    let export = bronze::ingest(bronze_path).await?;
    let silver_tickets = silver::read_dataset(silver_path).await?;
    let evaluated = gold::read_dataset(gold_dataset_path).await?;

    let mut priority_rule_violations: Vec<String> = Vec::new();
    for record in &evaluated {
        let expected = policy.expected_hours_for_label(&record.priority);
        if record.sla_expected != expected && !priority_rule_violations.contains(&record.priority)
        {
            priority_rule_violations.push(record.priority.clone());
        }
    }
    priority_rule_violations.sort();

    let missing_hours_records = evaluated
        .iter()
        .filter(|r| r.hours_resolution.is_none())
        .count();
    let missing_analyst_records = evaluated.iter().filter(|r| r.analyst.is_none()).count();
    let chronology_violations = evaluated
        .iter()
        .filter(|r| matches!(r.resolved_at, Some(resolved) if resolved < r.created_at))
        .count();

    Ok(AuditReport {
        bronze_records: export.issues.len(),
        silver_records: silver_tickets.len(),
        gold_records: evaluated.len(),
        priority_rule_violations,
        missing_hours_records,
        missing_analyst_records,
        chronology_violations,
    })
}

pub fn format_audit_report(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str("🔍 DATA QUALITY AUDIT\n");
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    out.push_str("📊 VOLUMETRICS\n");
    out.push_str(&format!("   Bronze: {} records\n", report.bronze_records));
    out.push_str(&format!(
        "   Silver: {} records (after date cleaning)\n",
        report.silver_records
    ));
    out.push_str(&format!(
        "   Gold:   {} records (after status filter)\n\n",
        report.gold_records
    ));

    out.push_str("🧪 SLA RULE CHECK\n");
    if report.priority_rule_violations.is_empty() {
        out.push_str("   ✅ Stored thresholds match the policy table\n\n");
    } else {
        for priority in &report.priority_rule_violations {
            out.push_str(&format!(
                "   ❌ Threshold mismatch for priority '{}'\n",
                priority
            ));
        }
        out.push('\n');
    }

    out.push_str("🛡️ MISSING VALUES\n");
    if report.missing_hours_records == 0 && report.missing_analyst_records == 0 {
        out.push_str("   ✅ No missing values in the gold layer\n\n");
    } else {
        if report.missing_hours_records > 0 {
            out.push_str(&format!(
                "   ⚠️ {} records without resolution hours\n",
                report.missing_hours_records
            ));
        }
        if report.missing_analyst_records > 0 {
            out.push_str(&format!(
                "   ⚠️ {} records without an analyst\n",
                report.missing_analyst_records
            ));
        }
        out.push('\n');
    }

    out.push_str("📅 CHRONOLOGY\n");
    if report.chronology_violations == 0 {
        out.push_str("   ✅ All resolution dates are post-creation\n");
    } else {
        out.push_str(&format!(
            "   ❌ {} tickets with backdated resolution\n",
            report.chronology_violations
        ));
    }

    out
}
