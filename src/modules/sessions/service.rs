//! Mentorship session service.
//!
//! Proposal and confirmation form a two-party handshake: one participant
//! proposes slots, the other confirms exactly one of them. Confirmation is a
//! guarded UPDATE so concurrent confirms cannot both land. Every other
//! update merges role-permitted fields in Rust and writes once.

use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    CreateSessionDto, MentorshipSession, PopulatedSession, PopulatedSessionRow, SessionStatus,
    TimeSlot, UpdateSessionDto,
};
use super::workflow;
use crate::modules::requests::model::RequestStatus;
use crate::modules::users::model::{User, UserRole};
use crate::utils::errors::AppError;

const SESSION_COLUMNS: &str = "id, request_id, mentor_id, student_id, proposed_by, \
     proposed_slots, confirmed_slot, status, location_or_link, mentor_summary, \
     student_feedback, created_at, updated_at";

/// Joined SELECT producing one flat [`PopulatedSessionRow`] per session.
const POPULATED_SELECT: &str = "SELECT s.id, s.status, s.proposed_slots, s.confirmed_slot, \
     s.location_or_link, s.mentor_summary, s.student_feedback, s.created_at, s.updated_at, \
     r.id AS request_id, r.title AS request_title, r.status AS request_status, \
     m.id AS mentor_id, m.first_name AS mentor_first_name, \
     m.last_name AS mentor_last_name, m.email AS mentor_email, \
     st.id AS student_id, st.first_name AS student_first_name, \
     st.last_name AS student_last_name, st.email AS student_email, \
     p.id AS proposed_by_id, p.first_name AS proposed_by_first_name, \
     p.last_name AS proposed_by_last_name, p.role AS proposed_by_role \
     FROM mentorship_sessions s \
     JOIN mentorship_requests r ON r.id = s.request_id \
     JOIN users m ON m.id = s.mentor_id \
     JOIN users st ON st.id = s.student_id \
     JOIN users p ON p.id = s.proposed_by";

/// Field-level changes a role branch decided to apply. Unset fields keep
/// their current value when persisted.
#[derive(Debug, Default)]
struct SessionChanges {
    status: Option<SessionStatus>,
    proposed_slots: Option<Vec<TimeSlot>>,
    proposed_by: Option<Uuid>,
    clear_confirmed: bool,
    location_or_link: Option<String>,
    mentor_summary: Option<String>,
    student_feedback: Option<String>,
}

impl SessionChanges {
    fn is_noop(&self) -> bool {
        self.status.is_none()
            && self.proposed_slots.is_none()
            && self.location_or_link.is_none()
            && self.mentor_summary.is_none()
            && self.student_feedback.is_none()
    }
}

pub struct SessionService;

impl SessionService {
    #[instrument(skip(db, auth_user, dto))]
    pub async fn create_session(
        db: &PgPool,
        auth_user: &User,
        dto: CreateSessionDto,
    ) -> Result<PopulatedSession, AppError> {
        let (student_id, mentor_id, request_status) =
            sqlx::query_as::<_, (Uuid, Option<Uuid>, RequestStatus)>(
                "SELECT student_id, mentor_id, status FROM mentorship_requests
                 WHERE id = $1 AND is_deleted = FALSE",
            )
            .bind(dto.mentorship_request_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| {
                AppError::not_found(anyhow::anyhow!("Mentorship request not found"))
            })?;

        if !workflow::session_allowed_under(request_status) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Cannot create a session for a request in status {}",
                request_status
            )));
        }

        let is_owner = student_id == auth_user.id;
        let is_assigned = mentor_id == Some(auth_user.id);
        if !is_owner && !is_assigned {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only the request's student or assigned mentor can propose a session"
            )));
        }

        let Some(mentor_id) = mentor_id else {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Cannot propose a session before a mentor is assigned"
            )));
        };

        Self::validate_slots(&dto.proposed_date_times)?;

        let session_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO mentorship_sessions
                 (request_id, mentor_id, student_id, proposed_by, proposed_slots, location_or_link)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(dto.mentorship_request_id)
        .bind(mentor_id)
        .bind(student_id)
        .bind(auth_user.id)
        .bind(Json(&dto.proposed_date_times))
        .bind(dto.location_or_link.unwrap_or_default())
        .fetch_one(db)
        .await?;

        Self::get_populated(db, session_id).await
    }

    #[instrument(skip(db, auth_user))]
    pub async fn get_sessions_for_request(
        db: &PgPool,
        auth_user: &User,
        request_id: Uuid,
    ) -> Result<Vec<PopulatedSession>, AppError> {
        let (student_id, mentor_id) = sqlx::query_as::<_, (Uuid, Option<Uuid>)>(
            "SELECT student_id, mentor_id FROM mentorship_requests
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(request_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Mentorship request not found")))?;

        let is_owner = student_id == auth_user.id;
        let is_assigned = mentor_id == Some(auth_user.id);
        if auth_user.role != UserRole::Admin && !is_owner && !is_assigned {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You do not have permission to view sessions for this request"
            )));
        }

        let rows = sqlx::query_as::<_, PopulatedSessionRow>(&format!(
            "{POPULATED_SELECT} WHERE s.request_id = $1 AND s.is_deleted = FALSE
             ORDER BY s.created_at DESC"
        ))
        .bind(request_id)
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(PopulatedSessionRow::into_populated)
            .collect())
    }

    #[instrument(skip(db, auth_user, dto))]
    pub async fn update_session(
        db: &PgPool,
        auth_user: &User,
        session_id: Uuid,
        dto: UpdateSessionDto,
    ) -> Result<PopulatedSession, AppError> {
        let session = Self::get_raw(db, session_id).await?;

        let is_mentor = session.mentor_id == auth_user.id;
        let is_student = session.student_id == auth_user.id;
        let is_admin = auth_user.role == UserRole::Admin;

        if !is_admin && !is_mentor && !is_student {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You do not have permission to update this session"
            )));
        }

        if !dto.attempted_anything() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "No valid fields to update"
            )));
        }

        if (is_mentor || is_student)
            && dto.status == Some(SessionStatus::Confirmed)
            && let Some(slot) = dto.confirmed_date_time
        {
            Self::confirm(
                db,
                auth_user.id,
                &session,
                slot,
                dto.location_or_link.clone(),
                is_mentor,
            )
            .await?;
            return Self::get_populated(db, session_id).await;
        }

        if is_admin {
            Self::update_as_admin(db, &session, dto).await?;
        } else if is_mentor {
            Self::update_as_mentor(db, &session, dto).await?;
        } else {
            Self::update_as_student(db, &session, dto).await?;
        }

        Self::get_populated(db, session_id).await
    }

    /// The counterparty locks in one of the proposed slots. Guarded on
    /// `status = 'proposed'` so only one confirmation can win.
    async fn confirm(
        db: &PgPool,
        caller_id: Uuid,
        session: &MentorshipSession,
        slot: TimeSlot,
        location_or_link: Option<String>,
        caller_is_mentor: bool,
    ) -> Result<(), AppError> {
        if session.status != SessionStatus::Proposed {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Cannot confirm a session in status {}",
                session.status
            )));
        }

        if session.proposed_by == caller_id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You cannot confirm a session you proposed"
            )));
        }

        if !session
            .proposed_slots
            .0
            .iter()
            .any(|proposed| *proposed == slot)
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Confirmed time must match one of the proposed time slots"
            )));
        }

        // Location edits stay mentor-only, even during a confirm.
        let location = if caller_is_mentor {
            location_or_link.unwrap_or_else(|| session.location_or_link.clone())
        } else {
            session.location_or_link.clone()
        };

        let result = sqlx::query(
            "UPDATE mentorship_sessions
             SET status = $1, confirmed_slot = $2, location_or_link = $3
             WHERE id = $4 AND status = $5",
        )
        .bind(SessionStatus::Confirmed)
        .bind(Json(slot))
        .bind(location)
        .bind(session.id)
        .bind(SessionStatus::Proposed)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "This session is no longer awaiting confirmation"
            )));
        }

        Ok(())
    }

    async fn update_as_admin(
        db: &PgPool,
        session: &MentorshipSession,
        dto: UpdateSessionDto,
    ) -> Result<(), AppError> {
        let mut changes = SessionChanges {
            status: dto.status,
            location_or_link: dto.location_or_link,
            ..Default::default()
        };

        if changes.is_noop() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Requested update is not valid for your role or the session's current status"
            )));
        }

        // An admin forcing the status back to proposed invalidates any
        // previously confirmed slot.
        if changes.status == Some(SessionStatus::Proposed) {
            changes.clear_confirmed = true;
        }

        Self::persist(db, session, changes).await
    }

    async fn update_as_mentor(
        db: &PgPool,
        session: &MentorshipSession,
        dto: UpdateSessionDto,
    ) -> Result<(), AppError> {
        let mut changes = SessionChanges::default();

        if let Some(target) = dto.status {
            match target {
                SessionStatus::Held => {
                    if !workflow::held_reachable_from(session.status) {
                        return Err(AppError::bad_request(anyhow::anyhow!(
                            "Cannot mark a session held from status {}",
                            session.status
                        )));
                    }
                    changes.status = Some(SessionStatus::Held);
                }
                SessionStatus::CancelledByMentor => {
                    if !workflow::can_cancel_in(session.status) {
                        return Err(AppError::bad_request(anyhow::anyhow!(
                            "Cannot cancel a session in status {}",
                            session.status
                        )));
                    }
                    changes.status = Some(SessionStatus::CancelledByMentor);
                }
                SessionStatus::RescheduleRequestedByMentor => {
                    if !workflow::mentor_can_reschedule_from(session.status) {
                        return Err(AppError::bad_request(anyhow::anyhow!(
                            "Cannot request a reschedule from status {}",
                            session.status
                        )));
                    }
                    let slots = Self::require_fresh_slots(dto.proposed_date_times.clone())?;
                    changes.status = Some(SessionStatus::RescheduleRequestedByMentor);
                    changes.proposed_slots = Some(slots);
                    changes.proposed_by = Some(session.mentor_id);
                    changes.clear_confirmed = true;
                }
                _ => {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Requested update is not valid for your role or the session's current status"
                    )));
                }
            }
        }

        let effective_status = changes.status.unwrap_or(session.status);
        if dto.summary_mentor.is_some() && workflow::outcome_notes_attachable_in(effective_status) {
            changes.mentor_summary = dto.summary_mentor;
        }

        changes.location_or_link = dto.location_or_link;

        if changes.is_noop() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Requested update is not valid for your role or the session's current status"
            )));
        }

        Self::persist(db, session, changes).await
    }

    async fn update_as_student(
        db: &PgPool,
        session: &MentorshipSession,
        dto: UpdateSessionDto,
    ) -> Result<(), AppError> {
        let mut changes = SessionChanges::default();

        if let Some(target) = dto.status {
            match target {
                SessionStatus::CancelledByStudent => {
                    if !workflow::can_cancel_in(session.status) {
                        return Err(AppError::bad_request(anyhow::anyhow!(
                            "Cannot cancel a session in status {}",
                            session.status
                        )));
                    }
                    changes.status = Some(SessionStatus::CancelledByStudent);
                }
                SessionStatus::RescheduleRequestedByStudent => {
                    if !workflow::student_can_reschedule_from(session.status) {
                        return Err(AppError::bad_request(anyhow::anyhow!(
                            "Cannot request a reschedule from status {}",
                            session.status
                        )));
                    }
                    let slots = Self::require_fresh_slots(dto.proposed_date_times.clone())?;
                    changes.status = Some(SessionStatus::RescheduleRequestedByStudent);
                    changes.proposed_slots = Some(slots);
                    changes.proposed_by = Some(session.student_id);
                    changes.clear_confirmed = true;
                }
                _ => {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Requested update is not valid for your role or the session's current status"
                    )));
                }
            }
        }

        let effective_status = changes.status.unwrap_or(session.status);
        if dto.feedback_student.is_some() && workflow::outcome_notes_attachable_in(effective_status)
        {
            changes.student_feedback = dto.feedback_student;
        }

        if changes.is_noop() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Requested update is not valid for your role or the session's current status"
            )));
        }

        Self::persist(db, session, changes).await
    }

    async fn persist(
        db: &PgPool,
        session: &MentorshipSession,
        changes: SessionChanges,
    ) -> Result<(), AppError> {
        let slots = changes
            .proposed_slots
            .map(Json)
            .unwrap_or_else(|| session.proposed_slots.clone());
        let confirmed = if changes.clear_confirmed {
            None
        } else {
            session.confirmed_slot.clone()
        };

        sqlx::query(
            "UPDATE mentorship_sessions
             SET status = $1, proposed_slots = $2, proposed_by = $3, confirmed_slot = $4,
                 location_or_link = $5, mentor_summary = $6, student_feedback = $7
             WHERE id = $8",
        )
        .bind(changes.status.unwrap_or(session.status))
        .bind(slots)
        .bind(changes.proposed_by.unwrap_or(session.proposed_by))
        .bind(confirmed)
        .bind(
            changes
                .location_or_link
                .unwrap_or_else(|| session.location_or_link.clone()),
        )
        .bind(changes.mentor_summary.or_else(|| session.mentor_summary.clone()))
        .bind(
            changes
                .student_feedback
                .or_else(|| session.student_feedback.clone()),
        )
        .bind(session.id)
        .execute(db)
        .await?;

        Ok(())
    }

    fn require_fresh_slots(slots: Option<Vec<TimeSlot>>) -> Result<Vec<TimeSlot>, AppError> {
        let slots = slots.filter(|slots| !slots.is_empty()).ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!(
                "Rescheduling requires at least one proposed time slot"
            ))
        })?;
        Self::validate_slots(&slots)?;
        Ok(slots)
    }

    fn validate_slots(slots: &[TimeSlot]) -> Result<(), AppError> {
        if slots
            .iter()
            .any(|slot| slot.start_time >= slot.end_time)
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Each proposed slot must start before it ends"
            )));
        }
        Ok(())
    }

    async fn get_raw(db: &PgPool, session_id: Uuid) -> Result<MentorshipSession, AppError> {
        sqlx::query_as::<_, MentorshipSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM mentorship_sessions
             WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(session_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Session not found")))
    }

    async fn get_populated(db: &PgPool, session_id: Uuid) -> Result<PopulatedSession, AppError> {
        let row = sqlx::query_as::<_, PopulatedSessionRow>(&format!(
            "{POPULATED_SELECT} WHERE s.id = $1 AND s.is_deleted = FALSE"
        ))
        .bind(session_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Session not found")))?;

        Ok(row.into_populated())
    }
}
