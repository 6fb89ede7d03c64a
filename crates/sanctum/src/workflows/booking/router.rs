use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    BookingId, BookingStatus, PriestBookingRequest, ServiceBookingRequest, ServiceId,
};
use super::repository::{PriestBookingRepository, ServiceBookingRepository};
use super::service::{BookingError, BookingService};
use crate::workflows::priest::router::ACTOR_HEADER;
use crate::workflows::priest::ListingId;
use crate::workflows::profiles::{Actor, UserId};

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) status: BookingStatus,
}

/// Router builder for booking intake, status updates, and history reads.
pub fn booking_router<B, S>(service: Arc<BookingService<B, S>>) -> Router
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    Router::new()
        .route("/api/v1/bookings/priest", post(book_priest_handler::<B, S>))
        .route(
            "/api/v1/bookings/service",
            post(book_service_handler::<B, S>),
        )
        .route(
            "/api/v1/bookings/priest/:booking_id/status",
            post(priest_status_handler::<B, S>),
        )
        .route(
            "/api/v1/bookings/service/:booking_id/status",
            post(service_status_handler::<B, S>),
        )
        .route(
            "/api/v1/users/:user_id/bookings",
            get(user_bookings_handler::<B, S>),
        )
        .route(
            "/api/v1/listings/:listing_id/bookings",
            get(priest_bookings_handler::<B, S>),
        )
        .route(
            "/api/v1/services/:service_id/bookings",
            get(service_bookings_handler::<B, S>),
        )
        .with_state(service)
}

pub(crate) async fn book_priest_handler<B, S>(
    State(service): State<Arc<BookingService<B, S>>>,
    headers: HeaderMap,
    Json(request): Json<PriestBookingRequest>,
) -> Response
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    let actor = match caller_identity(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.book_priest(&actor, request) {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn book_service_handler<B, S>(
    State(service): State<Arc<BookingService<B, S>>>,
    headers: HeaderMap,
    Json(request): Json<ServiceBookingRequest>,
) -> Response
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    let actor = match caller_identity(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.book_service(&actor, request) {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn priest_status_handler<B, S>(
    State(service): State<Arc<BookingService<B, S>>>,
    Path(booking_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    match service.update_priest_status(&BookingId(booking_id), request.status) {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn service_status_handler<B, S>(
    State(service): State<Arc<BookingService<B, S>>>,
    Path(booking_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    match service.update_service_status(&BookingId(booking_id), request.status) {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn user_bookings_handler<B, S>(
    State(service): State<Arc<BookingService<B, S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    match service.bookings_for_user(&UserId(user_id)) {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn priest_bookings_handler<B, S>(
    State(service): State<Arc<BookingService<B, S>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    match service.bookings_for_priest(&ListingId(listing_id)) {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn service_bookings_handler<B, S>(
    State(service): State<Arc<BookingService<B, S>>>,
    Path(service_id): Path<String>,
) -> Response
where
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
{
    match service.bookings_for_service(&ServiceId(service_id)) {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Booking intake trusts the gateway-supplied identity header; role checks
/// happen in workflows that need them.
fn caller_identity(headers: &HeaderMap) -> Result<Actor, Response> {
    let raw = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match raw {
        Some(raw) => Ok(Actor {
            user_id: UserId::new(raw),
            is_admin: false,
        }),
        None => {
            let payload = json!({ "error": format!("{ACTOR_HEADER} header required") });
            Err((StatusCode::UNAUTHORIZED, Json(payload)).into_response())
        }
    }
}

fn error_response(error: BookingError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), Json(payload)).into_response()
}
