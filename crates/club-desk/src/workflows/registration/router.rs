use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{
    ApplicantId, CardId, DeselectionRequest, MeetingRequest, Registration, SelectionRequest,
};
use super::notifier::ApplicantNotifier;
use super::repository::{ApplicantRepository, CardRepository};
use super::service::{RegistrationError, RegistrationService};

type SharedService<R, C, N> = Arc<RegistrationService<R, C, N>>;

/// Router exposing registration, selection and card endpoints.
pub fn registration_router<R, C, N>(service: SharedService<R, C, N>) -> Router
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    Router::new()
        .route("/get-likes/:id", get(card_likes_handler::<R, C, N>))
        .route("/like-card/:id", post(like_card_handler::<R, C, N>))
        .route("/api/register", post(register_handler::<R, C, N>))
        .route("/api/users", get(list_handler::<R, C, N>))
        .route(
            "/api/schedule-meeting",
            post(schedule_meeting_handler::<R, C, N>),
        )
        .route("/api/select-user/:id", patch(select_handler::<R, C, N>))
        .route(
            "/api/deselect-user/:user_id",
            post(deselect_handler::<R, C, N>),
        )
        .route(
            "/api/deselected-users",
            get(deselected_list_handler::<R, C, N>),
        )
        .with_state(service)
}

fn reply(status: StatusCode, payload: serde_json::Value) -> Response {
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn card_likes_handler<R, C, N>(
    State(service): State<SharedService<R, C, N>>,
    Path(card_id): Path<String>,
) -> Response
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    match service.card_likes(&CardId(card_id)).await {
        Ok(likes) => reply(StatusCode::OK, json!({ "likes": likes })),
        Err(err) => card_error(err, "error fetching likes"),
    }
}

pub(crate) async fn like_card_handler<R, C, N>(
    State(service): State<SharedService<R, C, N>>,
    Path(card_id): Path<String>,
) -> Response
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    match service.like_card(&CardId(card_id)).await {
        Ok(likes) => reply(StatusCode::OK, json!({ "likes": likes })),
        Err(err) => card_error(err, "error liking card"),
    }
}

fn card_error(err: RegistrationError, context: &'static str) -> Response {
    match err {
        RegistrationError::CardNotFound(_) => {
            reply(StatusCode::NOT_FOUND, json!({ "error": "Card not found" }))
        }
        other => {
            error!(error = %other, "{context}");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            )
        }
    }
}

pub(crate) async fn register_handler<R, C, N>(
    State(service): State<SharedService<R, C, N>>,
    axum::Json(registration): axum::Json<Registration>,
) -> Response
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    match service.register(registration).await {
        Ok(_) => reply(
            StatusCode::CREATED,
            json!({ "message": "User registered successfully" }),
        ),
        Err(RegistrationError::DuplicateUid(_)) => reply(
            StatusCode::BAD_REQUEST,
            json!({ "message": "UID already registered" }),
        ),
        Err(other) => {
            error!(error = %other, "error registering user");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Internal server error" }),
            )
        }
    }
}

pub(crate) async fn list_handler<R, C, N>(
    State(service): State<SharedService<R, C, N>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    match service.applicants().await {
        Ok(applicants) => (StatusCode::OK, axum::Json(applicants)).into_response(),
        Err(err) => {
            error!(error = %err, "error fetching users");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Error fetching users" }),
            )
        }
    }
}

pub(crate) async fn deselected_list_handler<R, C, N>(
    State(service): State<SharedService<R, C, N>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    match service.deselected().await {
        Ok(archived) => (StatusCode::OK, axum::Json(archived)).into_response(),
        Err(err) => {
            error!(error = %err, "error fetching deselected users");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Error fetching deselected users" }),
            )
        }
    }
}

pub(crate) async fn schedule_meeting_handler<R, C, N>(
    State(service): State<SharedService<R, C, N>>,
    axum::Json(request): axum::Json<MeetingRequest>,
) -> Response
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    match service.schedule_meeting(request).await {
        Ok(_) => reply(
            StatusCode::OK,
            json!({ "message": "Meeting scheduled successfully" }),
        ),
        Err(RegistrationError::ApplicantNotFound(_)) => {
            reply(StatusCode::NOT_FOUND, json!({ "message": "User not found" }))
        }
        Err(other) => {
            error!(error = %other, "error scheduling meeting");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Error scheduling meeting", "error": other.to_string() }),
            )
        }
    }
}

pub(crate) async fn select_handler<R, C, N>(
    State(service): State<SharedService<R, C, N>>,
    Path(applicant_id): Path<String>,
    body: Option<axum::Json<SelectionRequest>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    let id = ApplicantId(applicant_id);
    let request = body.map(|axum::Json(request)| request).unwrap_or_default();
    match service.select(&id, request.is_selected()).await {
        Ok(_) => reply(
            StatusCode::OK,
            json!({ "message": "User selected successfully" }),
        ),
        Err(RegistrationError::SelectionNotRequested) => reply(
            StatusCode::BAD_REQUEST,
            json!({ "message": "Selection flag must be true" }),
        ),
        Err(RegistrationError::ApplicantNotFound(_)) => {
            reply(StatusCode::NOT_FOUND, json!({ "message": "User not found" }))
        }
        Err(other) => {
            error!(error = %other, applicant_id = %id, "error selecting user");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Error selecting user", "error": other.to_string() }),
            )
        }
    }
}

pub(crate) async fn deselect_handler<R, C, N>(
    State(service): State<SharedService<R, C, N>>,
    Path(applicant_id): Path<String>,
    body: Option<axum::Json<DeselectionRequest>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    let id = ApplicantId(applicant_id);
    let request = body.map(|axum::Json(request)| request).unwrap_or_default();
    match service.deselect(&id, request.reason).await {
        Ok(_) => reply(
            StatusCode::OK,
            json!({ "message": "User deselected successfully" }),
        ),
        Err(RegistrationError::ApplicantNotFound(_)) => {
            reply(StatusCode::NOT_FOUND, json!({ "message": "User not found" }))
        }
        Err(other) => {
            error!(error = %other, applicant_id = %id, "error deselecting user");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Error deselecting user" }),
            )
        }
    }
}
