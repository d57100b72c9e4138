use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::instrument;

use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{USER_COLUMNS, User};
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{
    AuthResponse, ForgotPasswordDto, LoginDto, RegisterDto, ResetPasswordDto, UserWithPassword,
};

/// Reset tokens are stored hashed; only the hash ever touches the database.
fn hash_reset_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub struct AuthService;

impl AuthService {
    /// Self-registration always produces a student account.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let email = dto.email.to_lowercase();
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, email, password, program, term, interests)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&email)
        .bind(&hashed_password)
        .bind(dto.program.unwrap_or_default())
        .bind(dto.term.unwrap_or_default())
        .bind(dto.interests.unwrap_or_default())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "This email is already registered"
                ));
            }
            AppError::from(e)
        })?;

        let token = create_access_token(user.id, user.role, jwt_config)?;

        Ok(AuthResponse { token, user })
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let email = dto.email.to_lowercase();

        // Unknown email and wrong password produce the same message so the
        // endpoint cannot be used to probe for accounts.
        let user_with_password = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE email = $1 AND is_deleted = FALSE"
        ))
        .bind(&email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        let is_valid = verify_password(&dto.password, &user_with_password.password)?;

        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let token = create_access_token(user_with_password.id, user_with_password.role, jwt_config)?;
        let user = user_with_password.into_user();

        Ok(AuthResponse { token, user })
    }

    /// Stores a hashed reset token valid for 10 minutes and emails the raw
    /// token to the account. Silently succeeds for unknown emails; the
    /// controller responds with the same message either way.
    #[instrument(skip(db, dto, email_config))]
    pub async fn forgot_password(
        db: &PgPool,
        dto: ForgotPasswordDto,
        email_config: &EmailConfig,
    ) -> Result<(), AppError> {
        let email = dto.email.to_lowercase();

        let user = sqlx::query_as::<_, (uuid::Uuid, String)>(
            "SELECT id, first_name FROM users WHERE email = $1 AND is_deleted = FALSE",
        )
        .bind(&email)
        .fetch_optional(db)
        .await?;

        let Some((user_id, first_name)) = user else {
            return Ok(());
        };

        let raw_token = generate_reset_token();
        let hashed_token = hash_reset_token(&raw_token);

        sqlx::query(
            "UPDATE users
             SET password_reset_token = $1, password_reset_expires = now() + interval '10 minutes'
             WHERE id = $2",
        )
        .bind(&hashed_token)
        .bind(user_id)
        .execute(db)
        .await?;

        let email_service = EmailService::new(email_config.clone());
        if let Err(e) = email_service
            .send_password_reset_email(&email, &first_name, &raw_token)
            .await
        {
            // Roll back the token so a half-sent reset can't linger.
            sqlx::query(
                "UPDATE users
                 SET password_reset_token = NULL, password_reset_expires = NULL
                 WHERE id = $1",
            )
            .bind(user_id)
            .execute(db)
            .await?;

            return Err(e);
        }

        Ok(())
    }

    /// Consumes a raw reset token. The lookup, expiry check, and column
    /// clearing happen in one guarded UPDATE, so a token can be used once.
    #[instrument(skip(db, raw_token, dto, jwt_config))]
    pub async fn reset_password(
        db: &PgPool,
        raw_token: &str,
        dto: ResetPasswordDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let hashed_token = hash_reset_token(raw_token);
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET password = $1, password_reset_token = NULL, password_reset_expires = NULL
             WHERE password_reset_token = $2
               AND password_reset_expires > now()
               AND is_deleted = FALSE
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&hashed_password)
        .bind(&hashed_token)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!(
                "Password reset token is invalid or has expired"
            ))
        })?;

        let token = create_access_token(user.id, user.role, jwt_config)?;

        Ok(AuthResponse { token, user })
    }
}
