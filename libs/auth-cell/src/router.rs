use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_middleware, require_roles, ADMIN_ONLY};

use crate::handlers;

/// Mounted under `/auth`.
pub fn auth_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register));

    let protected_routes = Router::new()
        .route("/validate", get(handlers::validate))
        .route("/users/{user_id}", get(handlers::get_user))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// Mounted under `/admin`.
pub fn user_admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", post(handlers::create_user).get(handlers::list_users))
        .route("/users/{user_id}", delete(handlers::delete_user))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
