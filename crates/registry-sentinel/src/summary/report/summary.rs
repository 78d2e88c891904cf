use super::super::domain::{AnomalyFlag, GroupKey, SummaryRecord, ValueField};
use super::super::loader::SummarySnapshot;
use super::super::query::{count_by_group, rank_groups, rank_priority_audit, sum_by_group};
use super::views::{MetricsView, RecordView, RegistryReportSummary};

/// Presentation limits for the ranked sections. Defaults match the dashboard:
/// ten bars per chart, twenty-five audit rows.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub hotspot_limit: usize,
    pub audit_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            hotspot_limit: 10,
            audit_limit: 25,
        }
    }
}

/// Splits a snapshot into its anomalous and safe subsets and projects the
/// dashboard summary from them. Holds references only; the snapshot stays
/// untouched.
#[derive(Debug)]
pub struct RegistryReport<'a> {
    snapshot: &'a SummarySnapshot,
    anomalous: Vec<&'a SummaryRecord>,
    safe: Vec<&'a SummaryRecord>,
}

impl<'a> RegistryReport<'a> {
    pub fn new(snapshot: &'a SummarySnapshot) -> Self {
        Self {
            snapshot,
            anomalous: snapshot.filter_by_anomaly(AnomalyFlag::Anomalous),
            safe: snapshot.filter_by_anomaly(AnomalyFlag::Normal),
        }
    }

    pub fn anomalous(&self) -> &[&'a SummaryRecord] {
        &self.anomalous
    }

    pub fn safe(&self) -> &[&'a SummaryRecord] {
        &self.safe
    }

    pub fn summary(&self, options: ReportOptions) -> RegistryReportSummary {
        let total_records = self.snapshot.len();
        let safe_count = self.safe.len();
        let integrity_score = if total_records > 0 {
            ((safe_count as f64 / total_records as f64) * 1000.0).round() / 10.0
        } else {
            100.0
        };

        let metrics = MetricsView {
            total_records,
            anomaly_count: self.anomalous.len(),
            safe_count,
            integrity_score,
        };

        let anomaly_hotspots = rank_groups(
            &count_by_group(&self.anomalous, GroupKey::State),
            options.hotspot_limit,
        );
        let safe_zones = rank_groups(
            &count_by_group(&self.safe, GroupKey::State),
            options.hotspot_limit,
        );
        let safe_volume_leaders = rank_groups(
            &sum_by_group(&self.safe, GroupKey::State, ValueField::TotalUpdates),
            options.hotspot_limit,
        );

        let priority_audit = rank_priority_audit(&self.anomalous, options.audit_limit)
            .into_iter()
            .map(RecordView::from_record)
            .collect();

        let insights =
            super::insights::generate_insights(&metrics, &anomaly_hotspots, &safe_volume_leaders);

        let warnings = self
            .snapshot
            .warnings()
            .iter()
            .map(|warning| warning.message())
            .collect();

        RegistryReportSummary {
            metrics,
            anomaly_hotspots,
            safe_zones,
            priority_audit,
            insights,
            warnings,
        }
    }
}
