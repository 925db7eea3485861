use crate::cli::ServeArgs;
use crate::infra::{open_store, AppState, OutboundMail};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use club_desk::config::AppConfig;
use club_desk::error::AppError;
use club_desk::telemetry;
use club_desk::workflows::feedback::FeedbackService;
use club_desk::workflows::registration::RegistrationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(database) = args.database.take() {
        config.store.database_path = Some(database);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(open_store(&config.store).await?);
    if config.store.database_path.is_none() {
        warn!("APP_DATABASE_PATH not set; records are kept in memory only");
    }

    let mail = OutboundMail::from_config(config.mail.as_ref())?;
    if matches!(mail, OutboundMail::Log) {
        warn!("SMTP_HOST not set; applicant mail will be logged instead of sent");
    }

    let feedback_service = Arc::new(FeedbackService::new(store.clone()));
    let registration_service = Arc::new(RegistrationService::new(
        store.clone(),
        store,
        Arc::new(mail),
    ));

    let app = with_workflow_routes(feedback_service, registration_service)
        .layer(Extension(app_state))
        .layer(CorsLayer::permissive())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "club desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
