//! Guard rules for session scheduling, kept as plain data like the request
//! workflow tables.

use super::model::SessionStatus;
use crate::modules::requests::model::RequestStatus;

/// Request statuses under which a session may be proposed.
pub const SESSION_PARENT_STATUSES: &[RequestStatus] =
    &[RequestStatus::AcceptedByMentor, RequestStatus::InProgress];

/// Statuses in which neither party may cancel anymore: the session already
/// happened, or a cancellation is already recorded.
pub const CANCEL_BLOCKED_IN: &[SessionStatus] = &[
    SessionStatus::Held,
    SessionStatus::CancelledByMentor,
    SessionStatus::CancelledByStudent,
];

/// Statuses from which the mentor may request a reschedule.
pub const MENTOR_RESCHEDULE_FROM: &[SessionStatus] =
    &[SessionStatus::Confirmed, SessionStatus::CancelledByStudent];

/// Statuses from which the student may request a reschedule.
pub const STUDENT_RESCHEDULE_FROM: &[SessionStatus] =
    &[SessionStatus::Confirmed, SessionStatus::CancelledByMentor];

pub fn session_allowed_under(status: RequestStatus) -> bool {
    SESSION_PARENT_STATUSES.contains(&status)
}

pub fn held_reachable_from(status: SessionStatus) -> bool {
    status == SessionStatus::Confirmed
}

pub fn can_cancel_in(status: SessionStatus) -> bool {
    !CANCEL_BLOCKED_IN.contains(&status)
}

pub fn mentor_can_reschedule_from(status: SessionStatus) -> bool {
    MENTOR_RESCHEDULE_FROM.contains(&status)
}

pub fn student_can_reschedule_from(status: SessionStatus) -> bool {
    STUDENT_RESCHEDULE_FROM.contains(&status)
}

/// Mentor summaries and student feedback record what happened in a meeting,
/// so they attach only to a held session.
pub fn outcome_notes_attachable_in(status: SessionStatus) -> bool {
    status == SessionStatus::Held
}
