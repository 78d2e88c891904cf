use metrics_exporter_prometheus::PrometheusHandle;
use registry_sentinel::config::DataConfig;
use registry_sentinel::error::AppError;
use registry_sentinel::summary::{SnapshotCache, SummarySnapshot};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) cache: Arc<SnapshotCache>,
    pub(crate) data: Arc<DataConfig>,
}

/// Every render re-resolves the snapshot through the cache; degraded-input
/// conditions are logged here so they are never silently absorbed.
pub(crate) fn load_snapshot(state: &AppState) -> Result<Arc<SummarySnapshot>, AppError> {
    let snapshot = state.cache.load(&state.data.summary_path)?;
    for warning in snapshot.warnings() {
        warn!(warning = warning.message(), "summary loaded with degraded input");
    }
    Ok(snapshot)
}
