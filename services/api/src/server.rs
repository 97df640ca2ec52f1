use crate::cli::ServeArgs;
use crate::infra::{load_scoring_config, AppState, ConfiguredDirectory};
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use care_match::config::AppConfig;
use care_match::error::AppError;
use care_match::matching::RecommendationService;
use care_match::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = ConfiguredDirectory::from_path(config.matching.doctors_path.as_deref());
    let source = directory.source_label();
    let scoring = load_scoring_config(args.scoring_config.as_ref())?;
    let service = Arc::new(
        RecommendationService::new(Arc::new(directory), scoring)?
            .with_default_top_n(config.matching.top_n),
    );

    let app = with_recommendation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        doctors = %source,
        top_n = config.matching.top_n,
        "care match service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
