use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::sessions::model::{
    CreateSessionDto, PopulatedSession, SessionResponse, UpdateSessionDto,
};
use crate::modules::sessions::service::SessionService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionDto,
    responses(
        (status = 201, description = "Session proposed", body = SessionResponse),
        (status = 400, description = "Validation error or request not schedulable", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - participants only", body = ErrorResponse),
        (status = 404, description = "Mentorship request not found", body = ErrorResponse)
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateSessionDto>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = SessionService::create_session(&state.db, &auth_user.0, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "Session created successfully".to_string(),
            session,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/sessions/request/{requestId}",
    params(
        ("requestId" = Uuid, Path, description = "Mentorship request ID")
    ),
    responses(
        (
            status = 200,
            description = "Sessions of the request, newest first",
            body = [PopulatedSession]
        ),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mentorship request not found", body = ErrorResponse)
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_sessions_for_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Vec<PopulatedSession>>, AppError> {
    let sessions =
        SessionService::get_sessions_for_request(&state.db, &auth_user.0, request_id).await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = UpdateSessionDto,
    responses(
        (status = 200, description = "Session updated", body = SessionResponse),
        (status = 400, description = "Update not valid for role or status", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSessionDto>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = SessionService::update_session(&state.db, &auth_user.0, id, dto).await?;
    Ok(Json(SessionResponse {
        message: "Session updated successfully".to_string(),
        session,
    }))
}
