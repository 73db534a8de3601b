use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_roles, ADMIN_ONLY};

use crate::handlers;

/// Mounted under `/admin`. Reads are open to any authenticated caller.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    let read_routes = Router::new()
        .route("/doctors", get(handlers::list_doctors))
        .route("/doctors/{doctor_id}", get(handlers::get_doctor));

    let admin_routes = Router::new()
        .route("/doctors", post(handlers::create_doctor))
        .route(
            "/doctors/{doctor_id}",
            put(handlers::update_doctor).delete(handlers::delete_doctor),
        )
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles));

    Router::new()
        .merge(read_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
