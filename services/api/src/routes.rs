use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use axum::Router;
use serde_json::json;
use std::sync::Arc;

use crate::infra::AppState;
use sanctum::workflows::booking::{
    booking_router, BookingService, PriestBookingRepository, ServiceBookingRepository,
};
use sanctum::workflows::directory::{directory_router, AccountProvider, UserDirectory};
use sanctum::workflows::priest::{
    priest_router, PriestApplicationService, PriestListingRepository, ProfileChangeNotifier,
};
use sanctum::workflows::profiles::ProfileRepository;

/// Domain routers merged with the operational endpoints every deployment
/// expects.
pub(crate) fn with_platform_routes<P, L, N, B, S, A>(
    applications: Arc<PriestApplicationService<P, L, N>>,
    bookings: Arc<BookingService<B, S>>,
    directory: Arc<UserDirectory<P, A>>,
) -> Router
where
    P: ProfileRepository + 'static,
    L: PriestListingRepository + 'static,
    N: ProfileChangeNotifier + 'static,
    B: PriestBookingRepository + 'static,
    S: ServiceBookingRepository + 'static,
    A: AccountProvider + 'static,
{
    priest_router(applications)
        .merge(booking_router(bookings))
        .merge(directory_router(directory))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        InMemoryPriestBookingRepository, InMemoryPriestListingRepository,
        InMemoryProfileRepository, InMemoryServiceBookingRepository, LoggingChangeNotifier,
        StaticAccountProvider,
    };
    use axum::body::Body;
    use axum::http::Request;
    use sanctum::workflows::profiles::{Profile, UserId};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let profiles = Arc::new(InMemoryProfileRepository::default());
        let mut admin = Profile::new(UserId::new("adm-1"));
        admin.is_admin = true;
        profiles.insert(admin).expect("admin seeds");

        let listings = Arc::new(InMemoryPriestListingRepository::default());
        let notifier = Arc::new(LoggingChangeNotifier::default());
        let accounts = Arc::new(StaticAccountProvider::default());

        let applications = Arc::new(PriestApplicationService::new(
            profiles.clone(),
            listings,
            notifier,
        ));
        let bookings = Arc::new(BookingService::new(
            Arc::new(InMemoryPriestBookingRepository::default()),
            Arc::new(InMemoryServiceBookingRepository::default()),
        ));
        let directory = Arc::new(UserDirectory::new(profiles, accounts));

        with_platform_routes(applications, bookings, directory)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn domain_routes_are_mounted() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/priests/applications/adm-1")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
