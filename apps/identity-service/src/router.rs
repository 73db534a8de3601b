use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use auth_cell::{auth_routes, user_admin_routes};
use center_cell::center_routes;
use doctor_cell::doctor_routes;
use patient_cell::patient_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .merge(user_admin_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(patient_routes(state.clone()))
        .merge(center_routes(state.clone()));

    Router::new()
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/auth", auth_routes(state))
        .nest("/admin", admin)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.config.service_name,
    }))
}
