use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use auth_cell::create_account;
use shared_database::{db_error, AppState};
use shared_models::auth::Role;
use shared_models::clinic::{Patient, PatientStatus};
use shared_models::error::AppError;

use crate::models::{parse_status, CreatePatientRequest, PatientRow, UpdatePatientRequest};

const PATIENT_COLUMNS: &str = "id, user_id, name, phone, status";

pub struct PatientService {
    pool: SqlitePool,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
        }
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, AppError> {
        let name = non_blank(request.name)
            .ok_or_else(|| AppError::Validation("Name is required".to_string()))?;
        let status = parse_status(request.status.as_deref())?.unwrap_or_default();
        let phone = non_blank(request.phone);

        debug!("Creating patient {}", name);

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let user_id = match (non_blank(request.username), request.password) {
            (Some(username), Some(password)) if !password.is_empty() => {
                let user = create_account(&mut *tx, &username, &password, Role::Patient).await?;
                Some(user.id)
            }
            _ => None,
        };

        let row = insert_patient(&mut *tx, &name, phone.as_deref(), status, user_id)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!("Patient {} created with status {}", row.id, status);
        row.try_into()
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, AppError> {
        let sql = format!("SELECT {} FROM patients ORDER BY id", PATIENT_COLUMNS);

        sqlx::query_as::<_, PatientRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(Patient::try_from)
            .collect()
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient, AppError> {
        let sql = format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS);

        sqlx::query_as::<_, PatientRow>(&sql)
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?
            .try_into()
    }

    pub async fn update_patient(
        &self,
        patient_id: i64,
        request: UpdatePatientRequest,
    ) -> Result<Patient, AppError> {
        let status = parse_status(request.status.as_deref())?;
        let current = self.get_patient(patient_id).await?;

        let name = non_blank(request.name).unwrap_or(current.name);
        let phone = non_blank(request.phone).or(current.phone);
        let status = status.unwrap_or(current.status);

        let sql = format!(
            "UPDATE patients SET name = ?, phone = ?, status = ? WHERE id = ? RETURNING {}",
            PATIENT_COLUMNS
        );

        let row = sqlx::query_as::<_, PatientRow>(&sql)
            .bind(&name)
            .bind(&phone)
            .bind(status.as_str())
            .bind(patient_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        info!("Patient {} updated", patient_id);
        row.try_into()
    }

    pub async fn delete_patient(&self, patient_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM patients WHERE id = ?")
            .bind(patient_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }

        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}

async fn insert_patient<'e, E>(
    executor: E,
    name: &str,
    phone: Option<&str>,
    status: PatientStatus,
    user_id: Option<i64>,
) -> Result<PatientRow, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "INSERT INTO patients (name, phone, status, user_id) VALUES (?, ?, ?, ?) RETURNING {}",
        PATIENT_COLUMNS
    );

    sqlx::query_as::<_, PatientRow>(&sql)
        .bind(name)
        .bind(phone)
        .bind(status.as_str())
        .bind(user_id)
        .fetch_one(executor)
        .await
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
