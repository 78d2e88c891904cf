use crate::infra::{load_snapshot, AppState};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use registry_sentinel::error::AppError;
use registry_sentinel::summary::{
    PincodeMatch, RecordView, RegistryReport, RegistryReportSummary, ReportOptions,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default = "default_hotspot_limit")]
    pub(crate) hotspot_limit: usize,
    #[serde(default = "default_audit_limit")]
    pub(crate) audit_limit: usize,
}

fn default_hotspot_limit() -> usize {
    ReportOptions::default().hotspot_limit
}

fn default_audit_limit() -> usize {
    ReportOptions::default().audit_limit
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupQuery {
    pub(crate) pincode: String,
    #[serde(default)]
    pub(crate) mode: PincodeMatch,
}

#[derive(Debug, Serialize)]
pub(crate) struct LookupResponse {
    pub(crate) query: String,
    pub(crate) mode: PincodeMatch,
    pub(crate) found: bool,
    pub(crate) matches: Vec<RecordView>,
}

pub(crate) fn registry_router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/registry/report",
            axum::routing::get(report_endpoint),
        )
        .route(
            "/api/v1/registry/lookup",
            axum::routing::get(lookup_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn report_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<RegistryReportSummary>, AppError> {
    let snapshot = load_snapshot(&state)?;
    let report = RegistryReport::new(&snapshot);
    let summary = report.summary(ReportOptions {
        hotspot_limit: params.hotspot_limit,
        audit_limit: params.audit_limit,
    });
    Ok(Json(summary))
}

pub(crate) async fn lookup_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, AppError> {
    let snapshot = load_snapshot(&state)?;
    let lookup = snapshot.lookup_by_pincode(&params.pincode, params.mode);
    let matches = lookup
        .records()
        .iter()
        .map(|record| RecordView::from_record(record))
        .collect();

    Ok(Json(LookupResponse {
        found: lookup.is_found(),
        matches,
        query: params.pincode,
        mode: params.mode,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use registry_sentinel::config::DataConfig;
    use registry_sentinel::summary::{LoadError, SnapshotCache};
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;

    const SAMPLE: &str = "state,district,pincode,total_updates,is_anomaly\n\
                          Delhi,New Delhi,110001,500,-1\n\
                          Delhi,Central Delhi,110002,300,-1\n\
                          Maharashtra,Mumbai,400001,800,1\n";

    fn write_fixture(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("fixture file created");
        file.write_all(SAMPLE.as_bytes()).expect("fixture written");
        path
    }

    fn state_for(path: PathBuf) -> AppState {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(handle),
            cache: Arc::new(SnapshotCache::new(Duration::from_secs(3600))),
            data: Arc::new(DataConfig {
                summary_path: path,
                cache_ttl: Duration::from_secs(3600),
            }),
        }
    }

    #[tokio::test]
    async fn report_endpoint_returns_the_dashboard_payload() {
        let path = write_fixture("sentinel-routes-report");
        let state = state_for(path.clone());

        let Json(summary) = report_endpoint(
            Extension(state),
            Query(ReportQuery {
                hotspot_limit: 10,
                audit_limit: 25,
            }),
        )
        .await
        .expect("report builds");

        assert_eq!(summary.metrics.total_records, 3);
        assert_eq!(summary.metrics.anomaly_count, 2);
        assert_eq!(summary.priority_audit[0].pincode, "110001");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn report_endpoint_aborts_when_the_source_is_missing() {
        let state = state_for(PathBuf::from("./no-such-summary.csv"));

        let error = report_endpoint(
            Extension(state),
            Query(ReportQuery {
                hotspot_limit: 10,
                audit_limit: 25,
            }),
        )
        .await
        .expect_err("load failure aborts the payload");

        assert!(matches!(
            error,
            AppError::Summary(LoadError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn lookup_endpoint_reports_a_miss_as_an_ordinary_value() {
        let path = write_fixture("sentinel-routes-lookup");
        let state = state_for(path.clone());

        let Json(hit) = lookup_endpoint(
            Extension(state.clone()),
            Query(LookupQuery {
                pincode: "110001".to_string(),
                mode: PincodeMatch::Exact,
            }),
        )
        .await
        .expect("lookup succeeds");
        assert!(hit.found);
        assert_eq!(hit.matches.len(), 1);
        assert_eq!(hit.matches[0].status_label, "SUSPICIOUS");

        let Json(miss) = lookup_endpoint(
            Extension(state),
            Query(LookupQuery {
                pincode: "999999".to_string(),
                mode: PincodeMatch::Exact,
            }),
        )
        .await
        .expect("a miss is not an error");
        assert!(!miss.found);
        assert!(miss.matches.is_empty());

        std::fs::remove_file(&path).ok();
    }
}
