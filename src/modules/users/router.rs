use axum::{Router, middleware, routing::get};

use crate::middleware::role::require_admin;
use crate::modules::users::controller::{
    create_user, delete_user, get_my_profile, get_user_by_id, get_users, update_my_profile,
    update_user,
};
use crate::state::AppState;

/// Self-service profile routes are open to any authenticated user; the
/// management routes sit behind the admin gate.
pub fn init_users_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", get(get_users).post(create_user))
        .route(
            "/{id}",
            get(get_user_by_id).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/profile/me", get(get_my_profile).put(update_my_profile))
        .merge(admin_routes)
}
