use super::super::domain::{AnomalyFlag, SummaryRecord};
use super::super::query::GroupTally;
use serde::Serialize;

/// A summary row projected for display, with the status and recommended
/// action derived from the anomaly flag.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub state: String,
    pub district: String,
    pub pincode: String,
    pub total_updates: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_enrolment: Option<u64>,
    pub status: AnomalyFlag,
    pub status_label: &'static str,
    pub action_label: &'static str,
}

impl RecordView {
    pub fn from_record(record: &SummaryRecord) -> Self {
        Self {
            state: record.state.clone(),
            district: record.district.clone(),
            pincode: record.pincode.clone(),
            total_updates: record.total_updates,
            total_enrolment: record.total_enrolment,
            status: record.flag,
            status_label: record.flag.status_label(),
            action_label: record.flag.action_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsView {
    pub total_records: usize,
    pub anomaly_count: usize,
    pub safe_count: usize,
    /// Percentage of safe rows, one decimal place.
    pub integrity_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Stable,
    Elevated,
    Critical,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Elevated => "Elevated",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryInsights {
    pub risk_level: RiskLevel,
    pub risk_level_label: &'static str,
    pub anomaly_share_pct: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_actions: Vec<String>,
}

/// Everything the dashboard renders, as plain data.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryReportSummary {
    pub metrics: MetricsView,
    pub anomaly_hotspots: Vec<GroupTally>,
    pub safe_zones: Vec<GroupTally>,
    pub priority_audit: Vec<RecordView>,
    pub insights: RegistryInsights,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<&'static str>,
}
