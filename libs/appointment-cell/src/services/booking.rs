use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use shared_database::is_unique_violation;
use shared_models::auth::{AuthUser, Role};

use crate::models::{
    parse_date, parse_timestamp, Appointment, AppointmentError, AppointmentStatus,
    CreateAppointmentRequest, DoctorAvailability, ListAppointmentsQuery, UpdateAppointmentRequest,
};
use crate::services::availability::AvailabilityService;
use crate::services::conflict::ConflictChecker;
use crate::services::identity_client::IdentityClient;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::resolver::EntityResolver;
use crate::state::SchedulingState;
use crate::store::{AppointmentFilter, AppointmentStore, NewAppointment};

pub struct AppointmentService {
    pool: SqlitePool,
    identity: Arc<dyn IdentityClient>,
}

impl AppointmentService {
    pub fn new(state: &SchedulingState) -> Self {
        Self {
            pool: state.pool.clone(),
            identity: state.identity.clone(),
        }
    }

    /// Book an appointment. Nothing is written unless all three references
    /// resolve and the slot is free.
    pub async fn create_appointment(
        &self,
        caller: &AuthUser,
        token: &str,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let (Some(patient_id), Some(doctor_id), Some(center_id), Some(raw_timestamp)) = (
            request.patient_id,
            request.doctor_id,
            request.center_id,
            request.timestamp.as_deref(),
        ) else {
            return Err(AppointmentError::Validation(
                "Required fields: timestamp, patient_id, doctor_id, center_id".to_string(),
            ));
        };

        let timestamp = parse_timestamp(raw_timestamp)?;
        debug!("User {} booking doctor {} at {}", caller.id, doctor_id, timestamp);

        EntityResolver::new(self.identity.as_ref())
            .resolve(token, doctor_id, center_id, patient_id)
            .await?;

        ConflictChecker::new(&self.pool)
            .ensure_slot_free(doctor_id, timestamp, None)
            .await?;

        let new = NewAppointment {
            timestamp,
            reason: request.reason.filter(|r| !r.trim().is_empty()),
            patient_id,
            doctor_id,
            center_id,
            registered_by: caller.id,
        };

        let row = AppointmentStore::insert(&self.pool, &new)
            .await
            .map_err(|e| slot_error(e, doctor_id, timestamp))?;

        info!("Appointment {} booked for doctor {} at {}", row.id, doctor_id, timestamp);
        row.try_into()
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        AppointmentStore::find_by_id(&self.pool, appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?
            .try_into()
    }

    /// Appointments visible to the caller, newest first. Clinicians and
    /// patients only ever see their own, resolved through their linked record.
    pub async fn list_appointments(
        &self,
        caller: &AuthUser,
        token: &str,
        query: ListAppointmentsQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let date = query.date.as_deref().map(parse_date).transpose()?;

        let filter = match caller.role {
            Role::Admin => AppointmentFilter {
                doctor_id: query.doctor_id,
                center_id: query.center_id,
                patient_id: query.patient_id,
                status: query
                    .status
                    .as_deref()
                    .map(str::parse::<AppointmentStatus>)
                    .transpose()?,
                date,
            },
            Role::FrontDesk => AppointmentFilter {
                date,
                ..AppointmentFilter::default()
            },
            Role::Clinician => {
                let doctors = self.identity.list_doctors(token).await?;
                match doctors.into_iter().find(|d| d.user_id == Some(caller.id)) {
                    Some(doctor) => AppointmentFilter {
                        doctor_id: Some(doctor.id),
                        ..AppointmentFilter::default()
                    },
                    None => return Ok(Vec::new()),
                }
            }
            Role::Patient => {
                let patients = self.identity.list_patients(token).await?;
                match patients.into_iter().find(|p| p.user_id == Some(caller.id)) {
                    Some(patient) => AppointmentFilter {
                        patient_id: Some(patient.id),
                        ..AppointmentFilter::default()
                    },
                    None => return Ok(Vec::new()),
                }
            }
        };

        AppointmentStore::list(&self.pool, &filter)
            .await?
            .into_iter()
            .map(Appointment::try_from)
            .collect()
    }

    /// Apply a partial update. Terminal appointments reject every change,
    /// including an empty one.
    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let current = self.get_appointment(appointment_id).await?;
        AppointmentLifecycleService::ensure_mutable(current.status)?;

        let status = match request.status.as_deref() {
            Some(raw) => {
                let next = raw.parse::<AppointmentStatus>()?;
                AppointmentLifecycleService::validate_status_transition(current.status, next)?;
                next
            }
            None => current.status,
        };

        let timestamp = match request.timestamp.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => current.timestamp,
        };

        if timestamp != current.timestamp && status != AppointmentStatus::Cancelled {
            ConflictChecker::new(&self.pool)
                .ensure_slot_free(current.doctor_id, timestamp, Some(appointment_id))
                .await?;
        }

        // A blank reason clears it; an absent one keeps the stored value.
        let reason = match request.reason {
            Some(reason) if reason.trim().is_empty() => None,
            Some(reason) => Some(reason),
            None => current.reason,
        };

        let row = AppointmentStore::update(&self.pool, appointment_id, timestamp, reason.as_deref(), status)
            .await
            .map_err(|e| slot_error(e, current.doctor_id, timestamp))?;

        info!("Appointment {} updated, status {}", appointment_id, status);
        row.try_into()
    }

    pub async fn delete_appointment(&self, appointment_id: i64) -> Result<(), AppointmentError> {
        if !AppointmentStore::delete(&self.pool, appointment_id).await? {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    pub async fn doctor_availability(
        &self,
        doctor_id: i64,
        date: Option<&str>,
    ) -> Result<DoctorAvailability, AppointmentError> {
        let date: NaiveDate = match date {
            Some(raw) if !raw.trim().is_empty() => parse_date(raw)?,
            _ => {
                return Err(AppointmentError::Validation(
                    "Query parameter date is required".to_string(),
                ))
            }
        };

        AvailabilityService::new(&self.pool)
            .occupied_slots(doctor_id, date)
            .await
    }
}

/// A unique-index violation means another writer took the slot first.
fn slot_error(err: sqlx::Error, doctor_id: i64, timestamp: chrono::NaiveDateTime) -> AppointmentError {
    if is_unique_violation(&err) {
        AppointmentError::SlotTaken { doctor_id, timestamp }
    } else {
        err.into()
    }
}
