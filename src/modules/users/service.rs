use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, USER_COLUMNS, UpdateMyProfileDto, UpdateUserDto, User,
    UserFilterParams,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::utils::password::hash_password;

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let page = filters.pagination.page();
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::from(" WHERE is_deleted = FALSE");
        let mut arg_index = 0;

        let search_pattern = filters.search.as_ref().map(|s| format!("%{}%", s));
        if search_pattern.is_some() {
            arg_index += 1;
            where_clause.push_str(&format!(
                " AND (first_name ILIKE ${i} OR last_name ILIKE ${i} OR email ILIKE ${i})",
                i = arg_index
            ));
        }
        if filters.role.is_some() {
            arg_index += 1;
            where_clause.push_str(&format!(" AND role = ${}", arg_index));
        }

        let count_query = format!("SELECT COUNT(*) FROM users{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(pattern) = &search_pattern {
            count_sql = count_sql.bind(pattern);
        }
        if let Some(role) = filters.role {
            count_sql = count_sql.bind(role);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {USER_COLUMNS} FROM users{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );
        let mut data_sql = sqlx::query_as::<_, User>(&data_query);
        if let Some(pattern) = &search_pattern {
            data_sql = data_sql.bind(pattern);
        }
        if let Some(role) = filters.role {
            data_sql = data_sql.bind(role);
        }
        let users = data_sql.fetch_all(db).await?;

        Ok(PaginatedUsersResponse {
            users,
            meta: PaginationMeta::new(total, page, limit),
        })
    }

    /// Admin-side creation with an explicit role. The partial unique index
    /// on active emails turns duplicate inserts into a clean 400.
    #[instrument(skip(db, dto))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let email = dto.email.to_lowercase();
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users
                 (first_name, last_name, email, password, role, photo_url, program, term,
                  specialties, interests)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&email)
        .bind(&hashed_password)
        .bind(dto.role)
        .bind(dto.photo_url.unwrap_or_default())
        .bind(dto.program.unwrap_or_default())
        .bind(dto.term.unwrap_or_default())
        .bind(dto.specialties.unwrap_or_default())
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

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_user_by_id(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let existing = Self::get_user_by_id(db, user_id).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let email = dto
            .email
            .map(|e| e.to_lowercase())
            .unwrap_or(existing.email);
        let role = dto.role.unwrap_or(existing.role);
        let photo_url = dto.photo_url.unwrap_or(existing.photo_url);
        let program = dto.program.unwrap_or(existing.program);
        let term = dto.term.unwrap_or(existing.term);
        let specialties = dto.specialties.unwrap_or(existing.specialties);
        let interests = dto.interests.unwrap_or(existing.interests);
        let is_verified = dto.is_verified.unwrap_or(existing.is_verified);

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET first_name = $1, last_name = $2, email = $3, role = $4, photo_url = $5,
                 program = $6, term = $7, specialties = $8, interests = $9, is_verified = $10
             WHERE id = $11 AND is_deleted = FALSE
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(role)
        .bind(&photo_url)
        .bind(&program)
        .bind(&term)
        .bind(&specialties)
        .bind(&interests)
        .bind(is_verified)
        .bind(user_id)
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

        Ok(user)
    }

    /// Soft delete. Refuses when the admin targets their own account.
    #[instrument(skip(db))]
    pub async fn delete_user(
        db: &PgPool,
        user_id: Uuid,
        current_user_id: Uuid,
    ) -> Result<(), AppError> {
        if user_id == current_user_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Admins cannot delete their own account"
            )));
        }

        let result = sqlx::query(
            "UPDATE users SET is_deleted = TRUE, deleted_at = now()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }

        Ok(())
    }

    /// Self-service profile edit. Role, email, and verification are
    /// untouchable here no matter what the caller sends.
    #[instrument(skip(db, dto))]
    pub async fn update_my_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateMyProfileDto,
    ) -> Result<User, AppError> {
        let existing = Self::get_user_by_id(db, user_id).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let photo_url = dto.photo_url.unwrap_or(existing.photo_url);
        let program = dto.program.unwrap_or(existing.program);
        let term = dto.term.unwrap_or(existing.term);
        let specialties = dto.specialties.unwrap_or(existing.specialties);
        let interests = dto.interests.unwrap_or(existing.interests);

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET first_name = $1, last_name = $2, photo_url = $3, program = $4, term = $5,
                 specialties = $6, interests = $7
             WHERE id = $8 AND is_deleted = FALSE
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&first_name)
        .bind(&last_name)
        .bind(&photo_url)
        .bind(&program)
        .bind(&term)
        .bind(&specialties)
        .bind(&interests)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(user)
    }
}
