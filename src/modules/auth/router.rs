use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{forgot_password, get_me, login_user, register_user, reset_password};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/me", get(get_me))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/{token}", put(reset_password))
}
