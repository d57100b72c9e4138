use axum::{Router, routing::get};

use crate::modules::help_types::controller::{
    create_help_type, delete_help_type, get_help_type_by_id, get_help_types, update_help_type,
};
use crate::state::AppState;

/// Reads are open to any authenticated user; the write handlers check for
/// the admin role themselves since they share paths with the reads.
pub fn init_help_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_help_types).post(create_help_type))
        .route(
            "/{id}",
            get(get_help_type_by_id)
                .put(update_help_type)
                .delete(delete_help_type),
        )
}
