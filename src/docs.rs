use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    AuthResponse, ForgotPasswordDto, LoginDto, MessageResponse, RegisterDto, ResetPasswordDto,
};
use crate::modules::help_types::model::{
    CreateHelpTypeDto, HelpType, HelpTypeResponse, UpdateHelpTypeDto,
};
use crate::modules::requests::model::{
    CreateRequestDto, HelpTypeSummary, MentorSummary, PopulatedRequest, RequestResponse,
    RequestStatus, StudentSummary, UpdateRequestDto,
};
use crate::modules::sessions::model::{
    CreateSessionDto, ParticipantSummary, PopulatedSession, ProposedBySummary, RequestSummary,
    SessionResponse, SessionStatus, TimeSlot, UpdateSessionDto,
};
use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateMyProfileDto, UpdateUserDto, User,
    UserFilterParams, UserRole,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user_by_id,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::get_my_profile,
        crate::modules::users::controller::update_my_profile,
        crate::modules::help_types::controller::get_help_types,
        crate::modules::help_types::controller::get_help_type_by_id,
        crate::modules::help_types::controller::create_help_type,
        crate::modules::help_types::controller::update_help_type,
        crate::modules::help_types::controller::delete_help_type,
        crate::modules::requests::controller::create_request,
        crate::modules::requests::controller::get_requests,
        crate::modules::requests::controller::get_request_by_id,
        crate::modules::requests::controller::update_request,
        crate::modules::requests::controller::delete_request,
        crate::modules::sessions::controller::create_session,
        crate::modules::sessions::controller::get_sessions_for_request,
        crate::modules::sessions::controller::update_session,
    ),
    components(
        schemas(
            User,
            UserRole,
            CreateUserDto,
            UpdateUserDto,
            UpdateMyProfileDto,
            UserFilterParams,
            PaginatedUsersResponse,
            RegisterDto,
            LoginDto,
            ForgotPasswordDto,
            ResetPasswordDto,
            AuthResponse,
            MessageResponse,
            ErrorResponse,
            HelpType,
            CreateHelpTypeDto,
            UpdateHelpTypeDto,
            HelpTypeResponse,
            RequestStatus,
            StudentSummary,
            MentorSummary,
            HelpTypeSummary,
            PopulatedRequest,
            CreateRequestDto,
            UpdateRequestDto,
            RequestResponse,
            SessionStatus,
            TimeSlot,
            RequestSummary,
            ParticipantSummary,
            ProposedBySummary,
            PopulatedSession,
            CreateSessionDto,
            UpdateSessionDto,
            SessionResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health checks"),
        (name = "Authentication", description = "Registration, login, and password reset"),
        (name = "Users", description = "User administration and profile endpoints"),
        (name = "Help Types", description = "Help type catalog management"),
        (name = "Mentorship Requests", description = "Mentorship request lifecycle"),
        (name = "Sessions", description = "Session scheduling and outcomes")
    ),
    info(
        title = "MentorHub API",
        version = "0.1.0",
        description = "A mentorship management REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication.",
        contact(
            name = "API Support",
            email = "support@mentorhub.app"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
