use sqlx::PgPool;

use crate::modules::users::model::UserRole;
use crate::utils::password::hash_password;

pub mod seeder;

/// Creates an admin account directly in the database. The API never hands
/// out an elevated role, so the first admin comes from here.
pub async fn create_admin_user(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (first_name, last_name, email, password, role, is_verified)
         VALUES ($1, $2, $3, $4, $5, TRUE)
         ON CONFLICT (email) WHERE is_deleted = FALSE DO NOTHING",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email.to_lowercase())
    .bind(hashed_password)
    .bind(UserRole::Admin)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("A user with this email already exists".into());
    }

    Ok(())
}
