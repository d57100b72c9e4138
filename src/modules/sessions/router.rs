use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::sessions::controller::{
    create_session, get_sessions_for_request, update_session,
};
use crate::state::AppState;

pub fn init_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/request/{request_id}", get(get_sessions_for_request))
        .route("/{id}", put(update_session))
}
