//! Mentorship request service.
//!
//! Update handling branches on the caller's relationship to the request
//! (admin, assigned mentor, claiming mentor, owning student) and defers the
//! status rules to the [`workflow`](super::workflow) tables. Writes that race
//! with other callers (the claim) are guarded UPDATEs so only one wins.

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    CreateRequestDto, MentorshipRequest, PopulatedRequest, PopulatedRequestRow, RequestStatus,
    UpdateRequestDto,
};
use super::workflow;
use crate::modules::users::model::{User, UserRole};
use crate::utils::errors::AppError;

const REQUEST_COLUMNS: &str = "id, student_id, mentor_id, help_type_id, title, description, \
     status, student_availability, internal_notes, created_at, updated_at";

/// Joined SELECT producing one flat [`PopulatedRequestRow`] per request.
/// Related users and help types are not filtered on `is_deleted` so that
/// old requests keep displaying their participants.
const POPULATED_SELECT: &str = "SELECT r.id, r.title, r.description, r.status, \
     r.student_availability, r.internal_notes, r.created_at, r.updated_at, \
     s.id AS student_id, s.first_name AS student_first_name, \
     s.last_name AS student_last_name, s.email AS student_email, \
     s.photo_url AS student_photo_url, s.program AS student_program, \
     s.term AS student_term, \
     m.id AS mentor_id, m.first_name AS mentor_first_name, \
     m.last_name AS mentor_last_name, m.email AS mentor_email, \
     m.photo_url AS mentor_photo_url, m.specialties AS mentor_specialties, \
     h.id AS help_type_id, h.name AS help_type_name, \
     h.description AS help_type_description \
     FROM mentorship_requests r \
     JOIN users s ON s.id = r.student_id \
     LEFT JOIN users m ON m.id = r.mentor_id \
     JOIN help_types h ON h.id = r.help_type_id";

pub struct RequestService;

impl RequestService {
    #[instrument(skip(db, dto))]
    pub async fn create_request(
        db: &PgPool,
        student_id: Uuid,
        dto: CreateRequestDto,
    ) -> Result<PopulatedRequest, AppError> {
        let help_type = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM help_types WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(dto.help_type_id)
        .fetch_optional(db)
        .await?;

        if help_type.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Help type not found")));
        }

        if let Some(mentor_id) = dto.mentor_user_id {
            Self::ensure_active_mentor(db, mentor_id).await?;
        }

        let request_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO mentorship_requests
                 (student_id, mentor_id, help_type_id, title, description, student_availability)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(student_id)
        .bind(dto.mentor_user_id)
        .bind(dto.help_type_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.student_availability.unwrap_or_default())
        .fetch_one(db)
        .await?;

        Self::get_populated(db, request_id).await
    }

    /// Role-scoped listing: students see their own requests, mentors see
    /// requests assigned to them plus the unassigned pending pool, admins
    /// see everything.
    #[instrument(skip(db, auth_user))]
    pub async fn get_requests(
        db: &PgPool,
        auth_user: &User,
    ) -> Result<Vec<PopulatedRequest>, AppError> {
        let rows = match auth_user.role {
            UserRole::Student => {
                sqlx::query_as::<_, PopulatedRequestRow>(&format!(
                    "{POPULATED_SELECT} WHERE r.is_deleted = FALSE AND r.student_id = $1
                     ORDER BY r.created_at DESC"
                ))
                .bind(auth_user.id)
                .fetch_all(db)
                .await?
            }
            UserRole::Mentor => {
                sqlx::query_as::<_, PopulatedRequestRow>(&format!(
                    "{POPULATED_SELECT} WHERE r.is_deleted = FALSE
                     AND (r.mentor_id = $1 OR (r.mentor_id IS NULL AND r.status = $2))
                     ORDER BY r.created_at DESC"
                ))
                .bind(auth_user.id)
                .bind(RequestStatus::Pending)
                .fetch_all(db)
                .await?
            }
            UserRole::Admin => {
                sqlx::query_as::<_, PopulatedRequestRow>(&format!(
                    "{POPULATED_SELECT} WHERE r.is_deleted = FALSE ORDER BY r.created_at DESC"
                ))
                .fetch_all(db)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(PopulatedRequestRow::into_populated)
            .collect())
    }

    #[instrument(skip(db, auth_user))]
    pub async fn get_request_by_id(
        db: &PgPool,
        auth_user: &User,
        request_id: Uuid,
    ) -> Result<PopulatedRequest, AppError> {
        let row = sqlx::query_as::<_, PopulatedRequestRow>(&format!(
            "{POPULATED_SELECT} WHERE r.id = $1 AND r.is_deleted = FALSE"
        ))
        .bind(request_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Mentorship request not found")))?;

        let is_owner = row.student_id == auth_user.id;
        let is_assigned = row.mentor_id == Some(auth_user.id);
        if auth_user.role != UserRole::Admin && !is_owner && !is_assigned {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You do not have permission to view this request"
            )));
        }

        Ok(row.into_populated())
    }

    #[instrument(skip(db, auth_user, dto))]
    pub async fn update_request(
        db: &PgPool,
        auth_user: &User,
        request_id: Uuid,
        dto: UpdateRequestDto,
    ) -> Result<PopulatedRequest, AppError> {
        let existing = Self::get_raw(db, request_id).await?;

        match auth_user.role {
            UserRole::Admin => Self::update_as_admin(db, &existing, dto).await?,
            UserRole::Mentor if existing.mentor_id == Some(auth_user.id) => {
                Self::update_as_assigned_mentor(db, &existing, dto).await?
            }
            UserRole::Mentor
                if existing.mentor_id.is_none()
                    && existing.status == RequestStatus::Pending
                    && dto.status == Some(RequestStatus::AcceptedByMentor) =>
            {
                Self::claim(db, auth_user.id, &existing, dto).await?
            }
            UserRole::Student if existing.student_id == auth_user.id => {
                Self::update_as_student(db, &existing, dto).await?
            }
            UserRole::Mentor | UserRole::Student => {
                return Err(AppError::forbidden(anyhow::anyhow!(
                    "You do not have permission to update this request"
                )));
            }
        }

        Self::get_populated(db, request_id).await
    }

    #[instrument(skip(db, auth_user))]
    pub async fn delete_request(
        db: &PgPool,
        auth_user: &User,
        request_id: Uuid,
    ) -> Result<(), AppError> {
        let existing = Self::get_raw(db, request_id).await?;

        match auth_user.role {
            UserRole::Admin => {}
            UserRole::Student if existing.student_id == auth_user.id => {
                if !workflow::student_can_delete_in(existing.status) {
                    return Err(AppError::forbidden(anyhow::anyhow!(
                        "Cannot delete a request in status {}",
                        existing.status
                    )));
                }
            }
            _ => {
                return Err(AppError::forbidden(anyhow::anyhow!(
                    "You do not have permission to delete this request"
                )));
            }
        }

        let result = sqlx::query(
            "UPDATE mentorship_requests SET is_deleted = TRUE, deleted_at = now()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(request_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Mentorship request not found"
            )));
        }

        Ok(())
    }

    async fn update_as_admin(
        db: &PgPool,
        existing: &MentorshipRequest,
        dto: UpdateRequestDto,
    ) -> Result<(), AppError> {
        if dto.status.is_none() && dto.mentor_user_id.is_none() && dto.internal_notes.is_none() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "No valid fields to update"
            )));
        }

        if let Some(status) = dto.status
            && !workflow::admin_can_set(status)
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Admins can only set status to one of: {}",
                workflow::status_list(workflow::ADMIN_SETTABLE)
            )));
        }

        let mentor_id = match dto.mentor_user_id {
            Some(Some(mentor_id)) => {
                Self::ensure_active_mentor(db, mentor_id).await?;
                Some(mentor_id)
            }
            Some(None) => None,
            None => existing.mentor_id,
        };

        sqlx::query(
            "UPDATE mentorship_requests SET status = $1, mentor_id = $2, internal_notes = $3
             WHERE id = $4",
        )
        .bind(dto.status.unwrap_or(existing.status))
        .bind(mentor_id)
        .bind(
            dto.internal_notes
                .unwrap_or_else(|| existing.internal_notes.clone()),
        )
        .bind(existing.id)
        .execute(db)
        .await?;

        Ok(())
    }

    async fn update_as_assigned_mentor(
        db: &PgPool,
        existing: &MentorshipRequest,
        dto: UpdateRequestDto,
    ) -> Result<(), AppError> {
        if dto.status.is_none() && dto.internal_notes.is_none() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "No valid fields to update"
            )));
        }

        if let Some(target) = dto.status {
            if !workflow::mentor_can_set(target) {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Mentors can only set status to one of: {}",
                    workflow::status_list(workflow::MENTOR_SETTABLE)
                )));
            }
            if !workflow::mentor_can_transition(existing.status, target) {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Cannot change status from {} to {}",
                    existing.status,
                    target
                )));
            }
        }

        sqlx::query("UPDATE mentorship_requests SET status = $1, internal_notes = $2 WHERE id = $3")
            .bind(dto.status.unwrap_or(existing.status))
            .bind(
                dto.internal_notes
                    .unwrap_or_else(|| existing.internal_notes.clone()),
            )
            .bind(existing.id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// An unassigned pending request is claimed by the first mentor whose
    /// guarded UPDATE lands; the loser sees zero rows and gets a 403.
    async fn claim(
        db: &PgPool,
        mentor_id: Uuid,
        existing: &MentorshipRequest,
        dto: UpdateRequestDto,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE mentorship_requests SET mentor_id = $1, status = $2, internal_notes = $3
             WHERE id = $4 AND mentor_id IS NULL AND status = $5",
        )
        .bind(mentor_id)
        .bind(RequestStatus::AcceptedByMentor)
        .bind(
            dto.internal_notes
                .unwrap_or_else(|| existing.internal_notes.clone()),
        )
        .bind(existing.id)
        .bind(RequestStatus::Pending)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "This request is no longer available to claim"
            )));
        }

        Ok(())
    }

    async fn update_as_student(
        db: &PgPool,
        existing: &MentorshipRequest,
        dto: UpdateRequestDto,
    ) -> Result<(), AppError> {
        let Some(target) = dto.status else {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "No valid fields to update"
            )));
        };

        if target != RequestStatus::CancelledByStudent {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Students can only set status to cancelled_by_student"
            )));
        }

        if !workflow::student_can_cancel_from(existing.status) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Cannot cancel a request in status {}",
                existing.status
            )));
        }

        sqlx::query("UPDATE mentorship_requests SET status = $1 WHERE id = $2")
            .bind(RequestStatus::CancelledByStudent)
            .bind(existing.id)
            .execute(db)
            .await?;

        Ok(())
    }

    async fn get_raw(db: &PgPool, request_id: Uuid) -> Result<MentorshipRequest, AppError> {
        sqlx::query_as::<_, MentorshipRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM mentorship_requests
             WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(request_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Mentorship request not found")))
    }

    async fn get_populated(db: &PgPool, request_id: Uuid) -> Result<PopulatedRequest, AppError> {
        let row = sqlx::query_as::<_, PopulatedRequestRow>(&format!(
            "{POPULATED_SELECT} WHERE r.id = $1 AND r.is_deleted = FALSE"
        ))
        .bind(request_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Mentorship request not found")))?;

        Ok(row.into_populated())
    }

    async fn ensure_active_mentor(db: &PgPool, mentor_id: Uuid) -> Result<(), AppError> {
        let mentor = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE id = $1 AND role = $2 AND is_deleted = FALSE",
        )
        .bind(mentor_id)
        .bind(UserRole::Mentor)
        .fetch_optional(db)
        .await?;

        if mentor.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Mentor not found")));
        }

        Ok(())
    }
}
