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
use crate::modules::help_types::model::{
    CreateHelpTypeDto, HelpType, HelpTypeResponse, UpdateHelpTypeDto,
};
use crate::modules::help_types::service::HelpTypeService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/helptypes",
    responses(
        (status = 200, description = "Active help types sorted by name", body = [HelpType]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Help Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_help_types(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<HelpType>>, AppError> {
    let help_types = HelpTypeService::get_help_types(&state.db).await?;
    Ok(Json(help_types))
}

#[utoipa::path(
    get,
    path = "/api/helptypes/{id}",
    params(
        ("id" = Uuid, Path, description = "Help type ID")
    ),
    responses(
        (status = 200, description = "Help type details", body = HelpType),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Help type not found", body = ErrorResponse)
    ),
    tag = "Help Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_help_type_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<HelpType>, AppError> {
    let help_type = HelpTypeService::get_help_type_by_id(&state.db, id).await?;
    Ok(Json(help_type))
}

#[utoipa::path(
    post,
    path = "/api/helptypes",
    request_body = CreateHelpTypeDto,
    responses(
        (status = 201, description = "Help type created", body = HelpTypeResponse),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    tag = "Help Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_help_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateHelpTypeDto>,
) -> Result<(StatusCode, Json<HelpTypeResponse>), AppError> {
    check_any_role(&auth_user, &[UserRole::Admin])?;

    let help_type = HelpTypeService::create_help_type(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(HelpTypeResponse {
            message: "Help type created successfully".to_string(),
            help_type,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/helptypes/{id}",
    params(
        ("id" = Uuid, Path, description = "Help type ID")
    ),
    request_body = UpdateHelpTypeDto,
    responses(
        (status = 200, description = "Help type updated", body = HelpTypeResponse),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Help type not found", body = ErrorResponse)
    ),
    tag = "Help Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_help_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateHelpTypeDto>,
) -> Result<Json<HelpTypeResponse>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin])?;

    let help_type = HelpTypeService::update_help_type(&state.db, id, dto).await?;
    Ok(Json(HelpTypeResponse {
        message: "Help type updated successfully".to_string(),
        help_type,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/helptypes/{id}",
    params(
        ("id" = Uuid, Path, description = "Help type ID")
    ),
    responses(
        (status = 200, description = "Help type deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Help type not found", body = ErrorResponse)
    ),
    tag = "Help Types",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_help_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin])?;

    HelpTypeService::delete_help_type(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Help type deleted successfully".to_string(),
    }))
}
