use mentorhub::modules::users::model::UserRole;
use mentorhub::utils::password::hash_password;
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Create a test user with the given role, bypassing the register endpoint.
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    password: &str,
    role: UserRole,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let (id, email) = sqlx::query_as::<_, (Uuid, String)>(
        r#"
        INSERT INTO users (first_name, last_name, email, password, role, is_verified)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        RETURNING id, email
        "#,
    )
    .bind("Test")
    .bind("User")
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestUser {
        id,
        email,
        password: password.to_string(),
        role,
    }
}

#[allow(dead_code)]
pub async fn create_test_help_type(tx: &mut Transaction<'_, Postgres>, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO help_types (name, description)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind("Test help type description")
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

/// Insert a mentorship request directly. Status starts as 'pending' with no
/// mentor assigned, matching what the create endpoint produces.
#[allow(dead_code)]
pub async fn create_test_request(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
    help_type_id: Uuid,
    title: &str,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO mentorship_requests (student_id, help_type_id, title, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(student_id)
    .bind(help_type_id)
    .bind(title)
    .bind("Test request description")
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, Uuid::new_v4())
}
