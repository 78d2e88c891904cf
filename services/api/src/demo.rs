use clap::Args;
use registry_sentinel::config::AppConfig;
use registry_sentinel::error::AppError;
use registry_sentinel::summary::{
    PincodeMatch, RegistryReport, RegistryReportSummary, ReportOptions, SummarySnapshot,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Summary CSV to read (defaults to the configured path)
    #[arg(long)]
    pub(crate) summary_csv: Option<PathBuf>,
    /// Number of states shown per ranked section
    #[arg(long, default_value_t = 10)]
    pub(crate) hotspot_limit: usize,
    /// Number of rows in the priority audit list
    #[arg(long, default_value_t = 25)]
    pub(crate) audit_limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    /// Pincode to search for
    pub(crate) pincode: String,
    /// Match any pincode containing the query instead of exact equality
    #[arg(long)]
    pub(crate) contains: bool,
    /// Summary CSV to read (defaults to the configured path)
    #[arg(long)]
    pub(crate) summary_csv: Option<PathBuf>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        summary_csv,
        hotspot_limit,
        audit_limit,
    } = args;

    let snapshot = load_snapshot_from(summary_csv)?;
    let report = RegistryReport::new(&snapshot);
    let summary = report.summary(ReportOptions {
        hotspot_limit,
        audit_limit,
    });

    render_report(&summary);
    Ok(())
}

pub(crate) fn run_lookup(args: LookupArgs) -> Result<(), AppError> {
    let LookupArgs {
        pincode,
        contains,
        summary_csv,
    } = args;

    let mode = if contains {
        PincodeMatch::Contains
    } else {
        PincodeMatch::Exact
    };

    let snapshot = load_snapshot_from(summary_csv)?;
    let lookup = snapshot.lookup_by_pincode(&pincode, mode);

    if !lookup.is_found() {
        println!("No pincode matching '{pincode}'.");
        return Ok(());
    }

    println!(
        "{:<10} {:<20} {:<20} {:>10}  {:<10} {}",
        "PINCODE", "STATE", "DISTRICT", "UPDATES", "STATUS", "ACTION"
    );
    for record in lookup.records() {
        println!(
            "{:<10} {:<20} {:<20} {:>10}  {:<10} {}",
            record.pincode,
            record.state,
            record.district,
            record.total_updates,
            record.flag.status_label(),
            record.flag.action_label()
        );
    }

    Ok(())
}

fn load_snapshot_from(override_path: Option<PathBuf>) -> Result<SummarySnapshot, AppError> {
    let path = match override_path {
        Some(path) => path,
        None => AppConfig::load()?.data.summary_path,
    };
    Ok(SummarySnapshot::from_path(path)?)
}

fn render_report(summary: &RegistryReportSummary) {
    println!("Registry anomaly review");
    println!(
        "  total records: {}   flagged: {}   safe: {}   integrity score: {}%",
        summary.metrics.total_records,
        summary.metrics.anomaly_count,
        summary.metrics.safe_count,
        summary.metrics.integrity_score
    );

    for warning in &summary.warnings {
        println!("  warning: {warning}");
    }

    println!("\nAnomaly hotspots");
    if summary.anomaly_hotspots.is_empty() {
        println!("  (no flagged states)");
    }
    for (position, tally) in summary.anomaly_hotspots.iter().enumerate() {
        println!("  {:>2}. {:<24} {}", position + 1, tally.group, tally.value);
    }

    println!("\nSafe zones");
    for (position, tally) in summary.safe_zones.iter().enumerate() {
        println!("  {:>2}. {:<24} {}", position + 1, tally.group, tally.value);
    }

    println!("\nPriority audit list");
    if summary.priority_audit.is_empty() {
        println!("  no flagged pincodes; nothing to audit");
    } else {
        println!(
            "  {:<10} {:<20} {:<20} {:>10}  {}",
            "PINCODE", "STATE", "DISTRICT", "UPDATES", "ACTION"
        );
        for entry in &summary.priority_audit {
            println!(
                "  {:<10} {:<20} {:<20} {:>10}  {}",
                entry.pincode, entry.state, entry.district, entry.total_updates, entry.action_label
            );
        }
    }

    println!(
        "\nInsights ({} risk, {}% flagged)",
        summary.insights.risk_level_label, summary.insights.anomaly_share_pct
    );
    for line in &summary.insights.observations {
        println!("  - {line}");
    }
    if !summary.insights.recommended_actions.is_empty() {
        println!("  recommended:");
        for line in &summary.insights.recommended_actions {
            println!("  - {line}");
        }
    }
}
