use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::{ApiJson, ApiPath, ApiQuery};

use crate::models::{
    Appointment, AppointmentList, AppointmentStatus, AvailabilityQuery, CreateAppointmentRequest,
    DoctorAvailability, ListAppointmentsQuery, UpdateAppointmentRequest,
};
use crate::services::booking::AppointmentService;
use crate::state::SchedulingState;

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<SchedulingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = AppointmentService::new(&state)
        .create_appointment(&user, auth.token(), request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment created successfully",
            "appointment": appointment,
        })),
    ))
}

/// Listing is scoped by the caller's role.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<SchedulingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<ListAppointmentsQuery>,
) -> Result<Json<AppointmentList>, AppError> {
    let appointments = AppointmentService::new(&state)
        .list_appointments(&user, auth.token(), query)
        .await?;

    Ok(Json(AppointmentList {
        total: appointments.len(),
        appointments,
    }))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<SchedulingState>>,
    ApiPath(appointment_id): ApiPath<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentService::new(&state)
        .get_appointment(appointment_id)
        .await?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<SchedulingState>>,
    ApiPath(appointment_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = AppointmentService::new(&state)
        .update_appointment(appointment_id, request)
        .await?;

    let message = if appointment.status == AppointmentStatus::Cancelled {
        "Appointment cancelled successfully"
    } else {
        "Appointment updated successfully"
    };

    Ok(Json(json!({
        "message": message,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<SchedulingState>>,
    ApiPath(appointment_id): ApiPath<i64>,
) -> Result<Json<Value>, AppError> {
    AppointmentService::new(&state)
        .delete_appointment(appointment_id)
        .await?;

    Ok(Json(json!({ "message": "Appointment deleted successfully" })))
}

#[axum::debug_handler]
pub async fn doctor_availability(
    State(state): State<Arc<SchedulingState>>,
    ApiPath(doctor_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> Result<Json<DoctorAvailability>, AppError> {
    let availability = AppointmentService::new(&state)
        .doctor_availability(doctor_id, query.date.as_deref())
        .await?;

    Ok(Json(availability))
}
