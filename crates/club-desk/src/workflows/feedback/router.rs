use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::FeedbackSubmission;
use super::repository::FeedbackRepository;
use super::service::FeedbackService;

pub fn feedback_router<R>(service: Arc<FeedbackService<R>>) -> Router
where
    R: FeedbackRepository + 'static,
{
    Router::new()
        .route("/submit-feedback", post(submit_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<FeedbackService<R>>>,
    body: Option<axum::Json<FeedbackSubmission>>,
) -> Response
where
    R: FeedbackRepository + 'static,
{
    // no body or no JSON content type stores an empty record
    let submission = body.map(|axum::Json(submission)| submission).unwrap_or_default();
    match service.submit(submission).await {
        Ok(_) => (
            StatusCode::CREATED,
            axum::Json(json!({ "message": "Feedback submitted successfully" })),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "error submitting feedback");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({ "message": "Internal server error" })),
            )
                .into_response()
        }
    }
}
