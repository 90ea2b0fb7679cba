use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority classes recognized by the SLA policy.
/// Anything outside the three known labels falls back to `Unspecified`,
/// which the policy maps to the configurable default threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    /// Unknown, empty, or missing label
    Unspecified = 0,
    /// "Low" — 120h expected resolution
    Low = 1,
    /// "Medium" — 72h expected resolution
    Medium = 2,
    /// "High" — 24h expected resolution
    High = 3,
}

impl Priority {
    /// Determine the priority class from a ticket's priority label.
    /// Matching is exact: the upstream tracker exports `High`/`Medium`/`Low`
    /// verbatim, and everything else is treated as unspecified.
    pub fn from_label(label: &str) -> Self {
        match label {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Unspecified,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unspecified => "Unspecified",
        };
        write!(f, "{}", label)
    }
}

/// A cleaned, fully-typed ticket record produced by the silver stage.
///
/// `created_at` is guaranteed present — records without a parseable
/// creation timestamp are dropped during transformation. `resolved_at`
/// stays optional: open tickets legitimately have none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub issue_type: String,
    pub status: String,
    pub priority: String,
    pub analyst: Option<String>,
    pub created_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
}

impl Ticket {
    pub fn priority_class(&self) -> Priority {
        Priority::from_label(&self.priority)
    }
}

/// A ticket enriched with the computed SLA fields. This is the gold-layer
/// record; downstream reporting aggregates over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedTicket {
    pub id: String,
    pub issue_type: String,
    pub status: String,
    pub priority: String,
    pub analyst: Option<String>,
    pub created_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
    /// Business hours between creation and resolution, `None` when either
    /// timestamp was missing (a data-quality anomaly at this stage).
    pub hours_resolution: Option<f64>,
    /// Expected resolution threshold for the ticket's priority, in hours.
    pub sla_expected: u32,
    /// Whether the ticket was resolved within its threshold.
    pub is_sla_met: bool,
}

/// Raw export document as produced by the issue tracker: a single JSON
/// object with an `issues` array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExport {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

/// One raw issue as exported. The tracker wraps the assignee and the
/// timestamps in single-element arrays; every field may be absent or null
/// on malformed records, so all of them are optional here and the silver
/// stage decides what to keep.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee: Option<Vec<RawAssignee>>,
    #[serde(default)]
    pub timestamps: Option<Vec<RawTimestamps>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAssignee {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTimestamps {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
}

impl RawIssue {
    /// First assignee's name, if the export carried one.
    pub fn analyst_name(&self) -> Option<String> {
        self.assignee
            .as_ref()
            .and_then(|list| list.first())
            .and_then(|a| a.name.clone())
    }

    /// Raw creation timestamp string from the first timestamps entry.
    pub fn created_at_raw(&self) -> Option<&str> {
        self.timestamps
            .as_ref()
            .and_then(|list| list.first())
            .and_then(|t| t.created_at.as_deref())
    }

    /// Raw resolution timestamp string from the first timestamps entry.
    pub fn resolved_at_raw(&self) -> Option<&str> {
        self.timestamps
            .as_ref()
            .and_then(|list| list.first())
            .and_then(|t| t.resolved_at.as_deref())
    }
}
