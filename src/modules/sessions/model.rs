//! Mentorship session models and DTOs.
//!
//! Sessions carry their proposed time slots as JSONB, so the slot list is a
//! typed [`TimeSlot`] vector wrapped in [`sqlx::types::Json`] at the row
//! level and unwrapped for the wire shape ([`PopulatedSession`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::requests::model::RequestStatus;
use crate::modules::users::model::UserRole;

/// Lifecycle of a scheduled session. Stored as the `session_status`
/// Postgres enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "session_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Proposed,
    Confirmed,
    Held,
    CancelledByMentor,
    CancelledByStudent,
    RescheduleRequestedByMentor,
    RescheduleRequestedByStudent,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Proposed => "proposed",
            SessionStatus::Confirmed => "confirmed",
            SessionStatus::Held => "held",
            SessionStatus::CancelledByMentor => "cancelled_by_mentor",
            SessionStatus::CancelledByStudent => "cancelled_by_student",
            SessionStatus::RescheduleRequestedByMentor => "reschedule_requested_by_mentor",
            SessionStatus::RescheduleRequestedByStudent => "reschedule_requested_by_student",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed or confirmed meeting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Raw database row. Internal; responses always use [`PopulatedSession`].
#[derive(Debug, Clone, FromRow)]
pub struct MentorshipSession {
    pub id: Uuid,
    pub request_id: Uuid,
    pub mentor_id: Uuid,
    pub student_id: Uuid,
    pub proposed_by: Uuid,
    pub proposed_slots: Json<Vec<TimeSlot>>,
    pub confirmed_slot: Option<Json<TimeSlot>>,
    pub status: SessionStatus,
    pub location_or_link: String,
    pub mentor_summary: Option<String>,
    pub student_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parent request summary embedded in populated sessions.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: Uuid,
    pub title: String,
    pub status: RequestStatus,
}

/// Mentor/student participant summary embedded in populated sessions.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Who proposed the current slots.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposedBySummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

/// The wire representation of a session, with related entities joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedSession {
    pub id: Uuid,
    pub status: SessionStatus,
    pub proposed_date_times: Vec<TimeSlot>,
    pub confirmed_date_time: Option<TimeSlot>,
    pub location_or_link: String,
    pub summary_mentor: Option<String>,
    pub feedback_student: Option<String>,
    pub mentorship_request: RequestSummary,
    pub mentor: ParticipantSummary,
    pub student: ParticipantSummary,
    pub proposed_by: ProposedBySummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by the populated SELECT; folded into
/// [`PopulatedSession`] in `into_populated`.
#[derive(Debug, FromRow)]
pub struct PopulatedSessionRow {
    pub id: Uuid,
    pub status: SessionStatus,
    pub proposed_slots: Json<Vec<TimeSlot>>,
    pub confirmed_slot: Option<Json<TimeSlot>>,
    pub location_or_link: String,
    pub mentor_summary: Option<String>,
    pub student_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub request_id: Uuid,
    pub request_title: String,
    pub request_status: RequestStatus,
    pub mentor_id: Uuid,
    pub mentor_first_name: String,
    pub mentor_last_name: String,
    pub mentor_email: String,
    pub student_id: Uuid,
    pub student_first_name: String,
    pub student_last_name: String,
    pub student_email: String,
    pub proposed_by_id: Uuid,
    pub proposed_by_first_name: String,
    pub proposed_by_last_name: String,
    pub proposed_by_role: UserRole,
}

impl PopulatedSessionRow {
    pub fn into_populated(self) -> PopulatedSession {
        PopulatedSession {
            id: self.id,
            status: self.status,
            proposed_date_times: self.proposed_slots.0,
            confirmed_date_time: self.confirmed_slot.map(|slot| slot.0),
            location_or_link: self.location_or_link,
            summary_mentor: self.mentor_summary,
            feedback_student: self.student_feedback,
            mentorship_request: RequestSummary {
                id: self.request_id,
                title: self.request_title,
                status: self.request_status,
            },
            mentor: ParticipantSummary {
                id: self.mentor_id,
                first_name: self.mentor_first_name,
                last_name: self.mentor_last_name,
                email: self.mentor_email,
            },
            student: ParticipantSummary {
                id: self.student_id,
                first_name: self.student_first_name,
                last_name: self.student_last_name,
                email: self.student_email,
            },
            proposed_by: ProposedBySummary {
                id: self.proposed_by_id,
                first_name: self.proposed_by_first_name,
                last_name: self.proposed_by_last_name,
                role: self.proposed_by_role,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionDto {
    pub mentorship_request_id: Uuid,
    #[validate(length(min = 1, message = "proposedDateTimes must not be empty"))]
    pub proposed_date_times: Vec<TimeSlot>,
    pub location_or_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionDto {
    pub status: Option<SessionStatus>,
    pub confirmed_date_time: Option<TimeSlot>,
    pub proposed_date_times: Option<Vec<TimeSlot>>,
    pub location_or_link: Option<String>,
    pub summary_mentor: Option<String>,
    pub feedback_student: Option<String>,
}

impl UpdateSessionDto {
    /// True when the body carried at least one field, i.e. the caller
    /// attempted something rather than sending `{}`.
    pub fn attempted_anything(&self) -> bool {
        self.status.is_some()
            || self.confirmed_date_time.is_some()
            || self.proposed_date_times.is_some()
            || self.location_or_link.is_some()
            || self.summary_mentor.is_some()
            || self.feedback_student.is_some()
    }
}

/// Envelope returned by create and update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub message: String,
    pub session: PopulatedSession,
}
