use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::help_types::model::{CreateHelpTypeDto, HelpType, UpdateHelpTypeDto};
use crate::utils::errors::AppError;

const HELP_TYPE_COLUMNS: &str = "id, name, description, created_at, updated_at";

pub struct HelpTypeService;

impl HelpTypeService {
    #[instrument(skip(db))]
    pub async fn get_help_types(db: &PgPool) -> Result<Vec<HelpType>, AppError> {
        let help_types = sqlx::query_as::<_, HelpType>(&format!(
            "SELECT {HELP_TYPE_COLUMNS} FROM help_types WHERE is_deleted = FALSE ORDER BY name"
        ))
        .fetch_all(db)
        .await?;

        Ok(help_types)
    }

    #[instrument(skip(db))]
    pub async fn get_help_type_by_id(db: &PgPool, help_type_id: Uuid) -> Result<HelpType, AppError> {
        let help_type = sqlx::query_as::<_, HelpType>(&format!(
            "SELECT {HELP_TYPE_COLUMNS} FROM help_types WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(help_type_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Help type not found")))?;

        Ok(help_type)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_help_type(db: &PgPool, dto: CreateHelpTypeDto) -> Result<HelpType, AppError> {
        let help_type = sqlx::query_as::<_, HelpType>(&format!(
            "INSERT INTO help_types (name, description)
             VALUES ($1, $2)
             RETURNING {HELP_TYPE_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(dto.description.unwrap_or_default())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "A help type with this name already exists"
                ));
            }
            AppError::from(e)
        })?;

        Ok(help_type)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_help_type(
        db: &PgPool,
        help_type_id: Uuid,
        dto: UpdateHelpTypeDto,
    ) -> Result<HelpType, AppError> {
        let existing = Self::get_help_type_by_id(db, help_type_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.unwrap_or(existing.description);

        let help_type = sqlx::query_as::<_, HelpType>(&format!(
            "UPDATE help_types
             SET name = $1, description = $2
             WHERE id = $3 AND is_deleted = FALSE
             RETURNING {HELP_TYPE_COLUMNS}"
        ))
        .bind(&name)
        .bind(&description)
        .bind(help_type_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "A help type with this name already exists"
                ));
            }
            AppError::from(e)
        })?;

        Ok(help_type)
    }

    #[instrument(skip(db))]
    pub async fn delete_help_type(db: &PgPool, help_type_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE help_types SET is_deleted = TRUE, deleted_at = now()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(help_type_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Help type not found")));
        }

        Ok(())
    }
}
