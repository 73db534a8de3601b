use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_roles, ADMIN_ONLY};

use crate::handlers;

pub fn center_routes(state: Arc<AppState>) -> Router {
    let read_routes = Router::new()
        .route("/centers", get(handlers::list_centers))
        .route("/centers/{center_id}", get(handlers::get_center));

    let admin_routes = Router::new()
        .route("/centers", post(handlers::create_center))
        .route(
            "/centers/{center_id}",
            put(handlers::update_center).delete(handlers::delete_center),
        )
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles));

    Router::new()
        .merge(read_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
