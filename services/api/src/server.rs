use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::registry_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use registry_sentinel::config::AppConfig;
use registry_sentinel::error::AppError;
use registry_sentinel::summary::SnapshotCache;
use registry_sentinel::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.summary_csv.take() {
        config.data.summary_path = path;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        cache: Arc::new(SnapshotCache::new(config.data.cache_ttl)),
        data: Arc::new(config.data.clone()),
    };

    let app = registry_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        summary = %config.data.summary_path.display(),
        "registry sentinel ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
