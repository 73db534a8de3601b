use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::clinic::{Center, CenterList};
use shared_models::error::AppError;
use shared_utils::extractor::{ApiJson, ApiPath};

use crate::models::CenterRequest;
use crate::services::center::CenterService;

#[axum::debug_handler]
pub async fn create_center(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CenterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let center = CenterService::new(&state).create_center(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Center created successfully",
            "center": center,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_centers(State(state): State<Arc<AppState>>) -> Result<Json<CenterList>, AppError> {
    let centers = CenterService::new(&state).list_centers().await?;

    Ok(Json(CenterList {
        total: centers.len(),
        centers,
    }))
}

#[axum::debug_handler]
pub async fn get_center(
    State(state): State<Arc<AppState>>,
    ApiPath(center_id): ApiPath<i64>,
) -> Result<Json<Center>, AppError> {
    Ok(Json(CenterService::new(&state).get_center(center_id).await?))
}

#[axum::debug_handler]
pub async fn update_center(
    State(state): State<Arc<AppState>>,
    ApiPath(center_id): ApiPath<i64>,
    ApiJson(request): ApiJson<CenterRequest>,
) -> Result<Json<Value>, AppError> {
    let center = CenterService::new(&state)
        .update_center(center_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Center updated",
        "center": center,
    })))
}

#[axum::debug_handler]
pub async fn delete_center(
    State(state): State<Arc<AppState>>,
    ApiPath(center_id): ApiPath<i64>,
) -> Result<Json<Value>, AppError> {
    CenterService::new(&state).delete_center(center_id).await?;
    Ok(Json(json!({ "message": "Center deleted successfully" })))
}
