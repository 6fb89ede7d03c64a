use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ApplicationStatusView, ListingUpdate};
use super::repository::{PriestListingRepository, ProfileChangeNotifier};
use super::service::{PriestApplicationService, WorkflowError};
use crate::workflows::profiles::{Actor, ProfileRepository, UserId};

/// Header carrying the caller identity, resolved against the profile
/// store before any workflow call.
pub const ACTOR_HEADER: &str = "x-user-id";

/// Router builder exposing the priest application lifecycle and listing
/// endpoints.
pub fn priest_router<P, L, N>(service: Arc<PriestApplicationService<P, L, N>>) -> Router
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/priests/applications",
            post(submit_handler::<P, L, N>),
        )
        .route(
            "/api/v1/priests/applications/:user_id",
            get(status_handler::<P, L, N>),
        )
        .route(
            "/api/v1/priests/applications/:user_id/approve",
            post(approve_handler::<P, L, N>),
        )
        .route(
            "/api/v1/priests/applications/:user_id/reject",
            post(reject_handler::<P, L, N>),
        )
        .route(
            "/api/v1/priests/applications/:user_id/revoke",
            post(revoke_handler::<P, L, N>),
        )
        .route(
            "/api/v1/priests/:user_id/listing",
            get(listing_handler::<P, L, N>).patch(update_listing_handler::<P, L, N>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<P, L, N>(
    State(service): State<Arc<PriestApplicationService<P, L, N>>>,
    headers: HeaderMap,
) -> Response
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    let actor = match resolve_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let target = actor.user_id.clone();
    match service.submit_application(&actor, &target) {
        Ok(profile) => {
            let view = ApplicationStatusView::from_profile(&profile, None);
            (StatusCode::ACCEPTED, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<P, L, N>(
    State(service): State<Arc<PriestApplicationService<P, L, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    match service.application_status(&UserId(user_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<P, L, N>(
    State(service): State<Arc<PriestApplicationService<P, L, N>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    let actor = match resolve_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.approve(&actor, &UserId(user_id)) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<P, L, N>(
    State(service): State<Arc<PriestApplicationService<P, L, N>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    let actor = match resolve_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.reject(&actor, &UserId(user_id)) {
        Ok(profile) => {
            let view = ApplicationStatusView::from_profile(&profile, None);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn revoke_handler<P, L, N>(
    State(service): State<Arc<PriestApplicationService<P, L, N>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    let actor = match resolve_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.revoke(&actor, &UserId(user_id)) {
        Ok(profile) => {
            let view = ApplicationStatusView::from_profile(&profile, None);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn listing_handler<P, L, N>(
    State(service): State<Arc<PriestApplicationService<P, L, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    match service.listing_for_user(&UserId(user_id)) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_listing_handler<P, L, N>(
    State(service): State<Arc<PriestApplicationService<P, L, N>>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(update): Json<ListingUpdate>,
) -> Response
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    let actor = match resolve_actor(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.update_listing(&actor, &UserId(user_id), update) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

fn resolve_actor<P, L, N>(
    service: &PriestApplicationService<P, L, N>,
    headers: &HeaderMap,
) -> Result<Actor, Response>
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
{
    let raw = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let Some(raw) = raw else {
        let payload = json!({ "error": format!("{ACTOR_HEADER} header required") });
        return Err((StatusCode::UNAUTHORIZED, Json(payload)).into_response());
    };

    service.actor(&UserId::new(raw)).map_err(error_response)
}

fn error_response(error: WorkflowError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), Json(payload)).into_response()
}
