use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::clinic::{Patient, PatientList};
use shared_models::error::AppError;
use shared_utils::extractor::{ApiJson, ApiPath};

use crate::models::{CreatePatientRequest, UpdatePatientRequest};
use crate::services::patient::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient = PatientService::new(&state).create_patient(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Patient created successfully",
            "patient": patient,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PatientList>, AppError> {
    let patients = PatientService::new(&state).list_patients().await?;

    Ok(Json(PatientList {
        total: patients.len(),
        patients,
    }))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    ApiPath(patient_id): ApiPath<i64>,
) -> Result<Json<Patient>, AppError> {
    Ok(Json(PatientService::new(&state).get_patient(patient_id).await?))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    ApiPath(patient_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(&state)
        .update_patient(patient_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Patient updated",
        "patient": patient,
    })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    ApiPath(patient_id): ApiPath<i64>,
) -> Result<Json<Value>, AppError> {
    PatientService::new(&state).delete_patient(patient_id).await?;

    Ok(Json(json!({ "message": "Patient deleted successfully" })))
}
