use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_roles, ADMIN_ONLY, ADMIN_OR_FRONT_DESK};

use crate::handlers;

/// Mounted under `/admin`. Front desk staff may register and edit patients;
/// deleting one is reserved for admins.
pub fn patient_routes(state: Arc<AppState>) -> Router {
    let read_routes = Router::new()
        .route("/patients", get(handlers::list_patients))
        .route("/patients/{patient_id}", get(handlers::get_patient));

    let staff_routes = Router::new()
        .route("/patients", post(handlers::create_patient))
        .route("/patients/{patient_id}", put(handlers::update_patient))
        .route_layer(middleware::from_fn_with_state(ADMIN_OR_FRONT_DESK, require_roles));

    let admin_routes = Router::new()
        .route("/patients/{patient_id}", delete(handlers::delete_patient))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles));

    Router::new()
        .merge(read_routes)
        .merge(staff_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
