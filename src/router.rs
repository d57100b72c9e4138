use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::model::MessageResponse;
use crate::modules::auth::router::init_auth_router;
use crate::modules::help_types::router::init_help_types_router;
use crate::modules::requests::router::init_requests_router;
use crate::modules::sessions::router::init_sessions_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use crate::utils::errors::AppError;
use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router, middleware};
use tower_http::cors::CorsLayer;
use tracing::instrument;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .route("/health", get(health))
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router(state.clone()))
                .nest("/helptypes", init_help_types_router())
                .nest("/mentorship-requests", init_requests_router())
                .nest("/sessions", init_sessions_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service and database are reachable", body = MessageResponse)
    ),
    tag = "Health"
)]
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Result<Json<MessageResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&state.db).await?;
    Ok(Json(MessageResponse {
        message: "ok".to_string(),
    }))
}
