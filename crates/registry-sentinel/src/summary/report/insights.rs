use super::super::query::GroupTally;
use super::views::{MetricsView, RegistryInsights, RiskLevel};

pub(crate) fn generate_insights(
    metrics: &MetricsView,
    anomaly_hotspots: &[GroupTally],
    safe_volume_leaders: &[GroupTally],
) -> RegistryInsights {
    let anomaly_share_pct = if metrics.total_records > 0 {
        round_pct(metrics.anomaly_count as f64 / metrics.total_records as f64 * 100.0)
    } else {
        0.0
    };

    let risk_level = if metrics.anomaly_count == 0 {
        RiskLevel::Stable
    } else if anomaly_share_pct >= 5.0 {
        RiskLevel::Critical
    } else {
        RiskLevel::Elevated
    };

    let mut observations = Vec::new();
    if metrics.total_records == 0 {
        observations.push("summary table is empty; no activity to review".to_string());
    } else if metrics.anomaly_count == 0 {
        observations
            .push("no pincodes flagged; operational patterns within normal limits".to_string());
    } else {
        observations.push(format!(
            "{} of {} pincodes flagged as suspicious ({anomaly_share_pct}%)",
            metrics.anomaly_count, metrics.total_records
        ));
    }

    if let Some(top) = anomaly_hotspots.first() {
        observations.push(format!(
            "flagged activity concentrates in {} ({} pincodes)",
            top.group, top.value
        ));
    }

    if let Some(leader) = safe_volume_leaders.first() {
        observations.push(format!(
            "safe update volume peaks in {} ({} updates), consistent with labor migration into industrial hubs",
            leader.group, leader.value
        ));
    }

    let mut recommended_actions = Vec::new();
    if metrics.anomaly_count > 0 {
        recommended_actions.push(
            "trigger physical audits down the priority list, highest update volumes first"
                .to_string(),
        );
        if let Some(top) = anomaly_hotspots.first() {
            recommended_actions.push(format!(
                "notify the {} regional office before the next observation window",
                top.group
            ));
        }
    } else {
        recommended_actions.push("continue routine monitoring".to_string());
    }

    if safe_volume_leaders.first().is_some() {
        recommended_actions.push(
            "expand permanent enrolment capacity in the top safe states to sustain update load"
                .to_string(),
        );
    }

    RegistryInsights {
        risk_level,
        risk_level_label: risk_level.label(),
        anomaly_share_pct,
        observations,
        recommended_actions,
    }
}

fn round_pct(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
