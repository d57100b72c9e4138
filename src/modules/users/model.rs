//! User data models and DTOs.
//!
//! This module contains all data structures related to user management,
//! including the user entity, request/response DTOs, and the role enum.
//!
//! # Core Types
//!
//! - [`User`] - Base user entity from the database (password never included)
//! - [`UserRole`] - The three system roles: student, mentor, admin
//!
//! # Request DTOs
//!
//! - [`CreateUserDto`] - Admin-side user creation with an explicit role
//! - [`UpdateUserDto`] - Admin-side update of profile fields, role, verification
//! - [`UpdateMyProfileDto`] - Self-service profile edit (role/email immutable)
//! - [`UserFilterParams`] - Query parameters for the paginated user list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Role assigned to every user account.
///
/// Students submit mentorship requests, mentors take and run them, and
/// admins manage the whole system. Stored as the `user_role` Postgres enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Mentor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Mentor => "mentor",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user in the system.
///
/// This struct represents the user entity as exposed through the API.
/// The password hash and the reset-token columns are intentionally not
/// part of it; services select exactly these columns.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub photo_url: String,
    pub program: String,
    pub term: String,
    pub specialties: Vec<String>,
    pub interests: Vec<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns selected whenever a [`User`] row is fetched. Keeps the password
/// hash and reset-token columns out of every ordinary read.
pub const USER_COLUMNS: &str = "id, first_name, last_name, email, role, photo_url, program, \
     term, specialties, interests, is_verified, created_at, updated_at";

/// DTO for creating a new user.
///
/// Used by admins to create accounts with an explicit role. This is the
/// only way mentor and admin accounts come to exist through the API.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub role: UserRole,
    pub photo_url: Option<String>,
    pub program: Option<String>,
    pub term: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

/// DTO for admin-side user updates.
///
/// All fields optional; only provided fields are written. Password changes
/// are not possible here.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 1, message = "firstName cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "lastName cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub photo_url: Option<String>,
    pub program: Option<String>,
    pub term: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub is_verified: Option<bool>,
}

/// DTO for self-service profile updates.
///
/// Role, email, and the verification flag are deliberately absent.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMyProfileDto {
    #[validate(length(min = 1, message = "firstName cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "lastName cannot be empty"))]
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub program: Option<String>,
    pub term: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

/// Role filter values arrive as strings from the query string and may be
/// empty, which should behave like an absent filter.
fn deserialize_optional_role<'de, D>(deserializer: D) -> Result<Option<UserRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some("student") => Ok(Some(UserRole::Student)),
        Some("mentor") => Ok(Some(UserRole::Mentor)),
        Some("admin") => Ok(Some(UserRole::Admin)),
        Some(other) => Err(serde::de::Error::custom(format!("invalid role: {other}"))),
    }
}

/// Query parameters for filtering the user list.
///
/// `search` matches case-insensitively against first name, last name,
/// and email. All filters are optional and can be combined.
#[derive(Debug, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct UserFilterParams {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_role")]
    pub role: Option<UserRole>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

/// Paginated response containing users.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub users: Vec<User>,
    pub meta: crate::utils::pagination::PaginationMeta,
}
