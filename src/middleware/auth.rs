use anyhow::anyhow;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::modules::users::model::{USER_COLUMNS, User};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer token and loads the authenticated
/// user from the database.
///
/// Loading from the database (instead of trusting the claims alone) means
/// a token stops working the moment its account is soft deleted, and role
/// changes take effect on the next request. Role-gate middleware caches
/// the loaded user in request extensions so handlers behind a gate don't
/// hit the database twice.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<AuthUser>() {
            return Ok(cached.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized(anyhow!("Missing authorization header")))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid authorization header format")))?;

        let claims = verify_token(token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(anyhow!("Invalid user ID in token")))?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::unauthorized(anyhow!("The user belonging to this token no longer exists"))
        })?;

        Ok(AuthUser(user))
    }
}

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}
