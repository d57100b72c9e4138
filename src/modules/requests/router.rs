use axum::{Router, routing::get};

use crate::modules::requests::controller::{
    create_request, delete_request, get_request_by_id, get_requests, update_request,
};
use crate::state::AppState;

/// All routes require a bearer token; role checks happen in the handlers
/// and service since visibility depends on the caller's relationship to
/// each request.
pub fn init_requests_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_requests).post(create_request))
        .route(
            "/{id}",
            get(get_request_by_id)
                .put(update_request)
                .delete(delete_request),
        )
}
