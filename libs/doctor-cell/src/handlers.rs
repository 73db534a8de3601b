use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::clinic::{Doctor, DoctorList};
use shared_models::error::AppError;
use shared_utils::extractor::{ApiJson, ApiPath};

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::doctor::DoctorService;

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor = DoctorService::new(&state).create_doctor(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Doctor created successfully",
            "doctor": doctor,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Result<Json<DoctorList>, AppError> {
    let doctors = DoctorService::new(&state).list_doctors().await?;

    Ok(Json(DoctorList {
        total: doctors.len(),
        doctors,
    }))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    ApiPath(doctor_id): ApiPath<i64>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = DoctorService::new(&state).get_doctor(doctor_id).await?;
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    ApiPath(doctor_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state)
        .update_doctor(doctor_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Doctor updated",
        "doctor": doctor,
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    ApiPath(doctor_id): ApiPath<i64>,
) -> Result<Json<Value>, AppError> {
    DoctorService::new(&state).delete_doctor(doctor_id).await?;

    Ok(Json(json!({ "message": "Doctor deleted successfully" })))
}
