use serde::Deserialize;

use shared_models::clinic::{Patient, PatientStatus};
use shared_models::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PatientRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub status: String,
}

impl TryFrom<PatientRow> for Patient {
    type Error = AppError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<PatientStatus>().map_err(AppError::Internal)?;

        Ok(Patient {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            phone: row.phone,
            status,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

/// Parse a client-supplied status. Absent or blank means "not provided".
pub fn parse_status(raw: Option<&str>) -> Result<Option<PatientStatus>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<PatientStatus>()
            .map(Some)
            .map_err(AppError::Validation),
    }
}
