pub mod cache;
pub mod domain;
mod loader;
pub mod query;
pub mod report;

pub use cache::SnapshotCache;
pub use domain::{AnomalyFlag, GroupKey, SummaryRecord, ValueField};
pub use loader::{LoadError, LoadWarning, SummarySnapshot};
pub use query::{
    count_by_group, rank_groups, rank_priority_audit, sum_by_group, GroupTally, PincodeLookup,
    PincodeMatch,
};
pub use report::views::{RecordView, RegistryReportSummary};
pub use report::{RegistryReport, ReportOptions};
