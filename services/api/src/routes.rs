use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use listing_studio::workflows::listing::{
    listing_router, CategoryCatalog, CategoryId, GeolocationGateway, ListingService,
    SubmissionGateway,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct CatalogEntry {
    pub(crate) id: CategoryId,
    pub(crate) name: String,
    pub(crate) icon: &'static str,
    pub(crate) subcategories: Vec<String>,
}

pub(crate) fn with_listing_routes<S, G>(service: Arc<ListingService<S, G>>) -> Router
where
    S: SubmissionGateway + 'static,
    G: GeolocationGateway + 'static,
{
    let catalog = Arc::new(service.catalog().clone());

    listing_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(
            Router::new()
                .route("/api/v1/listings/catalog", get(catalog_endpoint))
                .with_state(catalog),
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

pub(crate) async fn catalog_endpoint(
    State(catalog): State<Arc<CategoryCatalog>>,
) -> Json<Vec<CatalogEntry>> {
    Json(
        catalog
            .categories()
            .iter()
            .map(|category| CatalogEntry {
                id: category.id.clone(),
                name: category.name.clone(),
                icon: category.icon(),
                subcategories: category.subcategories.clone(),
            })
            .collect(),
    )
}
