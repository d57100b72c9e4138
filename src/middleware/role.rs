//! Role-based authorization middleware for Axum
//!
//! This module provides two approaches for role-based access control:
//! 1. Layer-based middleware via [`require_roles`] and its wrappers
//! 2. Helper functions for manual role checking inside handlers

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware function that checks if the authenticated user has one of the
/// required roles.
///
/// On success the loaded [`AuthUser`] is inserted into request extensions,
/// so handlers behind the gate extract it without a second database load.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/users", get(list_users))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !allowed_roles.contains(&auth_user.0.role) {
        return Err(AppError::forbidden(anyhow!(
            "Access denied. Required roles: {:?}, but user has role: {}",
            allowed_roles,
            auth_user.0.role
        )));
    }

    parts.extensions.insert(auth_user);

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Route layer for admin-only routers.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Helper to check a user's role inside handler logic, for routers that mix
/// open and role-gated methods on the same path.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn create_help_type(auth_user: AuthUser, ...) -> Result<_, AppError> {
///     check_any_role(&auth_user, &[UserRole::Admin])?;
///     // Handler logic
/// }
/// ```
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&auth_user.0.role) {
        return Err(AppError::forbidden(anyhow!(
            "Access denied. Required roles: {:?}, but user has role: {}",
            allowed_roles,
            auth_user.0.role
        )));
    }

    Ok(())
}
