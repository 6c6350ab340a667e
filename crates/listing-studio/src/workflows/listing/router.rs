use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use super::catalog::CategoryId;
use super::geolocation::GeolocationGateway;
use super::navigation::NavigationCommand;
use super::publisher::{PublishError, SubmissionGateway};
use super::service::{DetailsUpdate, ListingService, ListingServiceError, SessionId};
use super::session::SessionError;

type SharedService<S, G> = Arc<ListingService<S, G>>;

/// Router builder exposing the listing session endpoints.
pub fn listing_router<S, G>(service: SharedService<S, G>) -> Router
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/listings/sessions", post(create_handler::<S, G>))
        .route(
            "/api/v1/listings/sessions/:session_id",
            get(view_handler::<S, G>).delete(discard_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/categories/:category_id/toggle",
            post(toggle_category_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/subcategories/toggle",
            post(toggle_subcategory_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/continue",
            post(continue_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/back",
            post(back_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/details",
            put(details_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/calendar/taps",
            post(tap_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/times",
            put(times_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/address/locate",
            post(locate_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/validation",
            get(validation_handler::<S, G>),
        )
        .route(
            "/api/v1/listings/sessions/:session_id/publish",
            post(publish_handler::<S, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubcategoryToggle {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DayTap {
    pub(crate) day: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TimesUpdate {
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    pub(crate) start: Option<NaiveTime>,
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    pub(crate) end: Option<NaiveTime>,
}

/// Parses an `HH:MM` clock time as sent by clients.
pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

fn deserialize_optional_time<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_time(&value).map_err(serde::de::Error::custom))
        .transpose()
}

pub(crate) async fn create_handler<S, G>(State(service): State<SharedService<S, G>>) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    let (session_id, view) = service.create_session();
    let payload = json!({ "session_id": session_id, "session": view });
    (StatusCode::CREATED, Json(payload)).into_response()
}

pub(crate) async fn view_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond(service.view(&SessionId(session_id)))
}

pub(crate) async fn discard_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    match service.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn toggle_category_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path((session_id, category_id)): Path<(String, String)>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond(service.toggle_category(&SessionId(session_id), &CategoryId(category_id)))
}

pub(crate) async fn toggle_subcategory_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
    Json(body): Json<SubcategoryToggle>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond(service.toggle_subcategory(&SessionId(session_id), &body.name))
}

pub(crate) async fn continue_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond_navigation(service.continue_to_details(&SessionId(session_id)))
}

pub(crate) async fn back_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond_navigation(service.back(&SessionId(session_id)))
}

pub(crate) async fn details_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
    Json(update): Json<DetailsUpdate>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond(service.update_details(&SessionId(session_id), update))
}

pub(crate) async fn tap_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
    Json(body): Json<DayTap>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond(service.tap_day(&SessionId(session_id), body.day))
}

pub(crate) async fn times_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
    Json(body): Json<TimesUpdate>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond(service.set_times(&SessionId(session_id), body.start, body.end))
}

pub(crate) async fn locate_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    respond(service.locate_address(&SessionId(session_id)))
}

pub(crate) async fn validation_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    match service.validation(&SessionId(session_id)) {
        Ok(missing) => {
            let payload = json!({ "valid": missing.is_empty(), "missing": missing });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn publish_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    match service.publish(&SessionId(session_id)) {
        Ok(acknowledgement) => {
            let payload = json!({
                "listing_id": acknowledgement.listing_id,
                "message": acknowledgement.message,
                "navigation": NavigationCommand::Home,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn respond<T: serde::Serialize>(result: Result<T, ListingServiceError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn respond_navigation<T: serde::Serialize>(
    result: Result<(NavigationCommand, T), ListingServiceError>,
) -> Response {
    match result {
        Ok((navigation, view)) => {
            let payload = json!({ "navigation": navigation, "session": view });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: ListingServiceError) -> Response {
    match err {
        ListingServiceError::SessionNotFound(id) => {
            let payload = json!({ "error": format!("listing session {id} not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        ListingServiceError::Session(error) => {
            let status = match &error {
                SessionError::WrongStep { .. } => StatusCode::CONFLICT,
                SessionError::Publish(PublishError::Submission(_)) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            (status, Json(error.notice())).into_response()
        }
    }
}
