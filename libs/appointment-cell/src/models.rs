use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

use crate::services::identity_client::IdentityClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal appointments accept no further mutation of any field.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            _ => Err(AppointmentError::InvalidStatus(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub center_id: i64,
    pub registered_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub center_id: Option<i64>,
    pub timestamp: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub status: Option<String>,
    pub reason: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAppointmentsQuery {
    pub doctor_id: Option<i64>,
    pub center_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub status: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentList {
    pub total: usize,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorAvailability {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub occupied_slots: Vec<String>,
    pub total: usize,
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 appointment timestamp into wall-clock time.
/// Inputs carrying an offset are converted to UTC first.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, AppointmentError> {
    let raw = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_utc());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| {
            AppointmentError::Validation(format!(
                "Invalid timestamp format: {}. Use ISO 8601 (YYYY-MM-DDTHH:MM:SS)",
                raw
            ))
        })
}

/// Parse a calendar date. A full timestamp is accepted and truncated to its date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppointmentError> {
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| parse_timestamp(raw).map(|ts| ts.date()))
        .map_err(|_| {
            AppointmentError::Validation(format!("Invalid date: {}. Use YYYY-MM-DD", raw))
        })
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("{entity} with ID {id} not found")]
    ReferenceNotFound { entity: &'static str, id: i64 },

    #[error("Patient with ID {0} is not active")]
    InactivePatient(i64),

    #[error("Cannot modify an appointment with status {0}")]
    Immutable(AppointmentStatus),

    #[error("Invalid status: {0}. Use SCHEDULED, COMPLETED or CANCELLED")]
    InvalidStatus(String),

    #[error("Status transition from {from} to {to} is not allowed")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Doctor {doctor_id} already has an appointment at {timestamp}")]
    SlotTaken {
        doctor_id: i64,
        timestamp: NaiveDateTime,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Identity(#[from] IdentityClientError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for AppointmentError {
    fn from(err: sqlx::Error) -> Self {
        AppointmentError::Database(err.to_string())
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::ReferenceNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::InactivePatient(_)
            | AppointmentError::Immutable(_)
            | AppointmentError::InvalidStatus(_)
            | AppointmentError::InvalidTransition { .. } => AppError::BusinessRule(err.to_string()),
            AppointmentError::SlotTaken { .. } => AppError::Conflict(err.to_string()),
            AppointmentError::Validation(msg) => AppError::Validation(msg),
            AppointmentError::Identity(identity) => identity.into(),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveTime;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap())
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("cancelled".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Cancelled);
        assert_eq!(" Scheduled ".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Scheduled);
        assert_matches!("POSTPONED".parse::<AppointmentStatus>(), Err(AppointmentError::InvalidStatus(_)));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = at("2025-06-01", "10:00:00");

        assert_eq!(parse_timestamp("2025-06-01T10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01T10:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01 10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01T12:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-01T10:00:00Z").unwrap(), expected);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_matches!(parse_timestamp("tomorrow at ten"), Err(AppointmentError::Validation(_)));
        assert_matches!(parse_timestamp("2025-13-01T10:00:00"), Err(AppointmentError::Validation(_)));
    }

    #[test]
    fn test_parse_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(parse_date("2025-06-01").unwrap(), date);
        assert_eq!(parse_date("2025-06-01T08:30:00").unwrap(), date);
        assert!(parse_date("01/06/2025").is_err());
    }

    #[test]
    fn test_error_mapping() {
        let not_found: AppError = AppointmentError::ReferenceNotFound { entity: "Doctor", id: 99 }.into();
        assert_matches!(not_found, AppError::NotFound(msg) if msg == "Doctor with ID 99 not found");

        let immutable: AppError = AppointmentError::Immutable(AppointmentStatus::Cancelled).into();
        assert_matches!(immutable, AppError::BusinessRule(_));

        let taken: AppError = AppointmentError::SlotTaken {
            doctor_id: 1,
            timestamp: at("2025-06-01", "10:00:00"),
        }
        .into();
        assert_matches!(taken, AppError::Conflict(_));

        let down: AppError = AppointmentError::Identity(IdentityClientError::Unavailable("timeout".into())).into();
        assert_matches!(down, AppError::DependencyUnavailable(_));
    }
}
