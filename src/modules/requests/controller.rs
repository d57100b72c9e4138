use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_any_role;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::requests::model::{
    CreateRequestDto, PopulatedRequest, RequestResponse, UpdateRequestDto,
};
use crate::modules::requests::service::RequestService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/mentorship-requests",
    request_body = CreateRequestDto,
    responses(
        (status = 201, description = "Mentorship request created", body = RequestResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - students only", body = ErrorResponse),
        (status = 404, description = "Help type or mentor not found", body = ErrorResponse)
    ),
    tag = "Mentorship Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateRequestDto>,
) -> Result<(StatusCode, Json<RequestResponse>), AppError> {
    check_any_role(&auth_user, &[UserRole::Student])?;

    let request = RequestService::create_request(&state.db, auth_user.id(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(RequestResponse {
            message: "Mentorship request created successfully".to_string(),
            mentorship_request: request,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/mentorship-requests",
    responses(
        (
            status = 200,
            description = "Requests visible to the caller, newest first",
            body = [PopulatedRequest]
        ),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Mentorship Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_requests(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<PopulatedRequest>>, AppError> {
    let requests = RequestService::get_requests(&state.db, &auth_user.0).await?;
    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/api/mentorship-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Mentorship request ID")
    ),
    responses(
        (status = 200, description = "Mentorship request details", body = PopulatedRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mentorship request not found", body = ErrorResponse)
    ),
    tag = "Mentorship Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_request_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PopulatedRequest>, AppError> {
    let request = RequestService::get_request_by_id(&state.db, &auth_user.0, id).await?;
    Ok(Json(request))
}

#[utoipa::path(
    put,
    path = "/api/mentorship-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Mentorship request ID")
    ),
    request_body = UpdateRequestDto,
    responses(
        (status = 200, description = "Mentorship request updated", body = RequestResponse),
        (status = 400, description = "Invalid transition or no valid fields", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mentorship request or mentor not found", body = ErrorResponse)
    ),
    tag = "Mentorship Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateRequestDto>,
) -> Result<Json<RequestResponse>, AppError> {
    let request = RequestService::update_request(&state.db, &auth_user.0, id, dto).await?;
    Ok(Json(RequestResponse {
        message: "Mentorship request updated successfully".to_string(),
        mentorship_request: request,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/mentorship-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Mentorship request ID")
    ),
    responses(
        (status = 200, description = "Mentorship request deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mentorship request not found", body = ErrorResponse)
    ),
    tag = "Mentorship Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    RequestService::delete_request(&state.db, &auth_user.0, id).await?;
    Ok(Json(MessageResponse {
        message: "Mentorship request deleted successfully".to_string(),
    }))
}
