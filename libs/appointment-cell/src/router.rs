use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_utils::extractor::{require_roles, ADMIN_ONLY, ADMIN_OR_FRONT_DESK};

use crate::handlers;
use crate::middleware::{remote_auth_middleware, BOOKING_ROLES};
use crate::state::SchedulingState;

/// Every route requires a credential the Identity Service accepts.
pub fn appointment_routes(state: Arc<SchedulingState>) -> Router {
    let read_routes = Router::new()
        .route("/appointments", get(handlers::list_appointments))
        .route("/appointments/{appointment_id}", get(handlers::get_appointment))
        .route(
            "/appointments/doctor/{doctor_id}/availability",
            get(handlers::doctor_availability),
        );

    let booking_routes = Router::new()
        .route("/appointments", post(handlers::create_appointment))
        .route_layer(middleware::from_fn_with_state(BOOKING_ROLES, require_roles));

    let desk_routes = Router::new()
        .route("/appointments/{appointment_id}", put(handlers::update_appointment))
        .route_layer(middleware::from_fn_with_state(ADMIN_OR_FRONT_DESK, require_roles));

    let admin_routes = Router::new()
        .route("/appointments/{appointment_id}", delete(handlers::delete_appointment))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles));

    Router::new()
        .merge(read_routes)
        .merge(booking_routes)
        .merge(desk_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), remote_auth_middleware))
        .with_state(state)
}
