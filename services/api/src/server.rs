use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, FixedGeolocation, InMemorySubmissionGateway};
use crate::routes::with_listing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use listing_studio::config::AppConfig;
use listing_studio::error::AppError;
use listing_studio::telemetry;
use listing_studio::workflows::listing::{AccordionSettings, ListingService};
use std::sync::atomic::{AtomicBool, Ordering};
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

    let catalog = load_catalog(&config.listing)?;
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // Device location is unavailable server-side; clients fill the address manually.
    let service = Arc::new(ListingService::new(
        catalog,
        AccordionSettings::from(&config.listing),
        Arc::new(InMemorySubmissionGateway::default()),
        Arc::new(FixedGeolocation::denied()),
    ));

    let app = with_listing_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "listing studio ready");

    axum::serve(listener, app).await?;
    Ok(())
}
