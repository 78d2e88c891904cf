use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classification produced upstream by the anomaly model. The summary table
/// encodes it as `-1` (flagged) or `1` (normal); any other value is rejected
/// at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyFlag {
    Anomalous,
    Normal,
}

impl AnomalyFlag {
    pub fn from_label(value: i64) -> Option<Self> {
        match value {
            -1 => Some(Self::Anomalous),
            1 => Some(Self::Normal),
            _ => None,
        }
    }

    pub const fn status_label(self) -> &'static str {
        match self {
            Self::Anomalous => "SUSPICIOUS",
            Self::Normal => "SAFE",
        }
    }

    pub const fn action_label(self) -> &'static str {
        match self {
            Self::Anomalous => "TRIGGER PHYSICAL AUDIT",
            Self::Normal => "ROUTINE MONITORING",
        }
    }
}

/// One row of the registry summary: aggregated update activity for a single
/// pincode over one observation window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub state: String,
    pub district: String,
    /// Kept as text so leading zeros and exact digit sequences survive for
    /// exact-match lookup.
    pub pincode: String,
    pub total_updates: u64,
    pub total_enrolment: Option<u64>,
    pub sat_score: Option<f64>,
    pub observed_on: Option<NaiveDate>,
    pub flag: AnomalyFlag,
}

/// Grouping fields accepted by the aggregation helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    State,
    District,
}

impl GroupKey {
    pub const fn label(self) -> &'static str {
        match self {
            Self::State => "State",
            Self::District => "District",
        }
    }

    pub fn value(self, record: &SummaryRecord) -> &str {
        match self {
            Self::State => &record.state,
            Self::District => &record.district,
        }
    }
}

/// Numeric fields accepted by the sum aggregation. Rows without an enrolment
/// figure contribute zero to enrolment sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueField {
    TotalUpdates,
    TotalEnrolment,
}

impl ValueField {
    pub fn value(self, record: &SummaryRecord) -> u64 {
        match self {
            Self::TotalUpdates => record.total_updates,
            Self::TotalEnrolment => record.total_enrolment.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_depend_only_on_the_flag() {
        assert_eq!(AnomalyFlag::Anomalous.status_label(), "SUSPICIOUS");
        assert_eq!(AnomalyFlag::Anomalous.action_label(), "TRIGGER PHYSICAL AUDIT");
        assert_eq!(AnomalyFlag::Normal.status_label(), "SAFE");
        assert_eq!(AnomalyFlag::Normal.action_label(), "ROUTINE MONITORING");
    }

    #[test]
    fn only_the_two_sentinel_labels_decode() {
        assert_eq!(AnomalyFlag::from_label(-1), Some(AnomalyFlag::Anomalous));
        assert_eq!(AnomalyFlag::from_label(1), Some(AnomalyFlag::Normal));
        assert_eq!(AnomalyFlag::from_label(0), None);
        assert_eq!(AnomalyFlag::from_label(2), None);
        assert_eq!(AnomalyFlag::from_label(-2), None);
    }
}
