use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryPriestBookingRepository, InMemoryPriestListingRepository,
    InMemoryProfileRepository, InMemoryServiceBookingRepository, LoggingChangeNotifier,
    StaticAccountProvider,
};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sanctum::config::AppConfig;
use sanctum::error::AppError;
use sanctum::telemetry;
use sanctum::workflows::booking::BookingService;
use sanctum::workflows::directory::UserDirectory;
use sanctum::workflows::priest::PriestApplicationService;
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

    let profiles = Arc::new(InMemoryProfileRepository::default());
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

    let app = with_platform_routes(applications, bookings, directory)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sanctum platform api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
