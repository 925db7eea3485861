use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json, Router};
use club_desk::workflows::feedback::{feedback_router, FeedbackRepository, FeedbackService};
use club_desk::workflows::registration::{
    registration_router, ApplicantNotifier, ApplicantRepository, CardRepository,
    RegistrationService,
};
use serde_json::json;
use std::sync::Arc;

/// Both workflow routers plus the operational endpoints.
pub(crate) fn with_workflow_routes<F, R, C, N>(
    feedback: Arc<FeedbackService<F>>,
    registration: Arc<RegistrationService<R, C, N>>,
) -> Router
where
    F: FeedbackRepository + 'static,
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    feedback_router(feedback)
        .merge(registration_router(registration))
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
