//! Role-gated transition rules for mentorship requests.
//!
//! The rules live here as plain data so they can be unit tested without a
//! database and so the service layer stays free of branching on role/state
//! combinations.

use super::model::RequestStatus;

/// Transitions the assigned mentor may drive: (from, allowed targets).
pub const MENTOR_TRANSITIONS: &[(RequestStatus, &[RequestStatus])] = &[
    (
        RequestStatus::Pending,
        &[
            RequestStatus::AcceptedByMentor,
            RequestStatus::RejectedByMentor,
        ],
    ),
    (
        RequestStatus::AcceptedByMentor,
        &[RequestStatus::InProgress, RequestStatus::CancelledByMentor],
    ),
    (
        RequestStatus::InProgress,
        &[RequestStatus::Completed, RequestStatus::CancelledByMentor],
    ),
];

/// Every status a mentor can ever set; targets outside this set get an
/// error listing it rather than a from/to message.
pub const MENTOR_SETTABLE: &[RequestStatus] = &[
    RequestStatus::AcceptedByMentor,
    RequestStatus::RejectedByMentor,
    RequestStatus::InProgress,
    RequestStatus::CancelledByMentor,
    RequestStatus::Completed,
];

/// Statuses from which the owning student may cancel.
pub const STUDENT_CANCELLABLE_FROM: &[RequestStatus] =
    &[RequestStatus::Pending, RequestStatus::AcceptedByMentor];

/// Statuses an admin may set directly, bypassing the transition tables.
pub const ADMIN_SETTABLE: &[RequestStatus] = &[
    RequestStatus::Pending,
    RequestStatus::RejectedByAdmin,
    RequestStatus::InProgress,
    RequestStatus::Completed,
    RequestStatus::CancelledByAdmin,
];

/// Statuses in which the owning student may delete the request. Everything
/// except an active engagement (in_progress, completed).
pub const STUDENT_DELETABLE_IN: &[RequestStatus] = &[
    RequestStatus::Pending,
    RequestStatus::AcceptedByMentor,
    RequestStatus::RejectedByMentor,
    RequestStatus::RejectedByAdmin,
    RequestStatus::CancelledByStudent,
    RequestStatus::CancelledByAdmin,
    RequestStatus::CancelledByMentor,
];

pub fn mentor_can_transition(from: RequestStatus, to: RequestStatus) -> bool {
    MENTOR_TRANSITIONS
        .iter()
        .find(|(source, _)| *source == from)
        .map(|(_, targets)| targets.contains(&to))
        .unwrap_or(false)
}

pub fn mentor_can_set(to: RequestStatus) -> bool {
    MENTOR_SETTABLE.contains(&to)
}

pub fn student_can_cancel_from(from: RequestStatus) -> bool {
    STUDENT_CANCELLABLE_FROM.contains(&from)
}

pub fn admin_can_set(to: RequestStatus) -> bool {
    ADMIN_SETTABLE.contains(&to)
}

pub fn student_can_delete_in(status: RequestStatus) -> bool {
    STUDENT_DELETABLE_IN.contains(&status)
}

/// Human-readable list of statuses for error messages.
pub fn status_list(statuses: &[RequestStatus]) -> String {
    statuses
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
