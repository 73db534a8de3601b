use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use appointment_cell::{appointment_routes, SchedulingState};

pub fn create_router(state: Arc<SchedulingState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state.clone())
        .merge(appointment_routes(state))
}

async fn health(State(state): State<Arc<SchedulingState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.config.service_name,
    }))
}
