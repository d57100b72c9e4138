//! Mentorship request models and DTOs.
//!
//! The API exposes requests in a populated shape with the student, mentor,
//! and help type embedded as summaries ([`PopulatedRequest`]); the raw row
//! ([`MentorshipRequest`]) stays internal to the service layer where the
//! workflow decisions are made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of a mentorship request. Stored as the `request_status`
/// Postgres enum; every transition is gated by role in the workflow module.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    AcceptedByMentor,
    RejectedByMentor,
    RejectedByAdmin,
    InProgress,
    Completed,
    CancelledByStudent,
    CancelledByAdmin,
    CancelledByMentor,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::AcceptedByMentor => "accepted_by_mentor",
            RequestStatus::RejectedByMentor => "rejected_by_mentor",
            RequestStatus::RejectedByAdmin => "rejected_by_admin",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::CancelledByStudent => "cancelled_by_student",
            RequestStatus::CancelledByAdmin => "cancelled_by_admin",
            RequestStatus::CancelledByMentor => "cancelled_by_mentor",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw database row. Internal; responses always use [`PopulatedRequest`].
#[derive(Debug, Clone, FromRow)]
pub struct MentorshipRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub mentor_id: Option<Uuid>,
    pub help_type_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: RequestStatus,
    pub student_availability: String,
    pub internal_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student summary embedded in populated requests.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: String,
    pub program: String,
    pub term: String,
}

/// Mentor summary embedded in populated requests.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: String,
    pub specialties: Vec<String>,
}

/// Help type summary embedded in populated requests.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelpTypeSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// The wire representation of a request, with related entities joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedRequest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: RequestStatus,
    pub student_availability: String,
    pub internal_notes: String,
    pub student: StudentSummary,
    pub mentor: Option<MentorSummary>,
    pub help_type: HelpTypeSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by the populated SELECT; folded into
/// [`PopulatedRequest`] in `into_populated`.
#[derive(Debug, FromRow)]
pub struct PopulatedRequestRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: RequestStatus,
    pub student_availability: String,
    pub internal_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub student_id: Uuid,
    pub student_first_name: String,
    pub student_last_name: String,
    pub student_email: String,
    pub student_photo_url: String,
    pub student_program: String,
    pub student_term: String,
    pub mentor_id: Option<Uuid>,
    pub mentor_first_name: Option<String>,
    pub mentor_last_name: Option<String>,
    pub mentor_email: Option<String>,
    pub mentor_photo_url: Option<String>,
    pub mentor_specialties: Option<Vec<String>>,
    pub help_type_id: Uuid,
    pub help_type_name: String,
    pub help_type_description: String,
}

impl PopulatedRequestRow {
    pub fn into_populated(self) -> PopulatedRequest {
        let mentor = self.mentor_id.map(|id| MentorSummary {
            id,
            first_name: self.mentor_first_name.unwrap_or_default(),
            last_name: self.mentor_last_name.unwrap_or_default(),
            email: self.mentor_email.unwrap_or_default(),
            photo_url: self.mentor_photo_url.unwrap_or_default(),
            specialties: self.mentor_specialties.unwrap_or_default(),
        });

        PopulatedRequest {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            student_availability: self.student_availability,
            internal_notes: self.internal_notes,
            student: StudentSummary {
                id: self.student_id,
                first_name: self.student_first_name,
                last_name: self.student_last_name,
                email: self.student_email,
                photo_url: self.student_photo_url,
                program: self.student_program,
                term: self.student_term,
            },
            mentor,
            help_type: HelpTypeSummary {
                id: self.help_type_id,
                name: self.help_type_name,
                description: self.help_type_description,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestDto {
    pub help_type_id: Uuid,
    #[validate(length(min = 1, max = 150, message = "title must be between 1 and 150 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub student_availability: Option<String>,
    pub mentor_user_id: Option<Uuid>,
}

/// Mentor assignment values arrive as a uuid string, `null`, or an empty
/// string; the latter two mean "unassign". A missing field means "leave
/// unchanged", so the outer Option tracks presence.
fn deserialize_unassignable_uuid<'de, D>(
    deserializer: D,
) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(Some(None)),
        Some(s) => Uuid::parse_str(s)
            .map(|id| Some(Some(id)))
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestDto {
    pub status: Option<RequestStatus>,
    #[serde(default, deserialize_with = "deserialize_unassignable_uuid")]
    #[schema(value_type = Option<Uuid>)]
    pub mentor_user_id: Option<Option<Uuid>>,
    pub internal_notes: Option<String>,
}

/// Envelope returned by create and update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub message: String,
    pub mentorship_request: PopulatedRequest,
}
