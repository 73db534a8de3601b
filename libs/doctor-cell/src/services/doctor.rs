use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use auth_cell::create_account;
use shared_database::{db_error, AppState};
use shared_models::auth::Role;
use shared_models::clinic::Doctor;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, DoctorRow, UpdateDoctorRequest};

const DOCTOR_COLUMNS: &str = "id, user_id, name, specialty";

pub struct DoctorService {
    pool: SqlitePool,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
        }
    }

    /// Create a doctor, plus a clinician account when credentials are supplied.
    /// Both rows are written in one transaction.
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, AppError> {
        let name = non_blank(request.name)
            .ok_or_else(|| AppError::Validation("Name is required".to_string()))?;
        let specialty = non_blank(request.specialty);

        debug!("Creating doctor {}", name);

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let user_id = match (non_blank(request.username), request.password) {
            (Some(username), Some(password)) if !password.is_empty() => {
                let user = create_account(&mut *tx, &username, &password, Role::Clinician).await?;
                Some(user.id)
            }
            _ => None,
        };

        let row = insert_doctor(&mut *tx, &name, specialty.as_deref(), user_id)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!("Doctor {} created", row.id);
        Ok(row.into())
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, AppError> {
        let sql = format!("SELECT {} FROM doctors ORDER BY id", DOCTOR_COLUMNS);

        let rows = sqlx::query_as::<_, DoctorRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, AppError> {
        let sql = format!("SELECT {} FROM doctors WHERE id = ?", DOCTOR_COLUMNS);

        sqlx::query_as::<_, DoctorRow>(&sql)
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(Doctor::from)
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
    }

    /// Blank or missing fields keep their stored value.
    pub async fn update_doctor(
        &self,
        doctor_id: i64,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, AppError> {
        let current = self.get_doctor(doctor_id).await?;

        let name = non_blank(request.name).unwrap_or(current.name);
        let specialty = non_blank(request.specialty).or(current.specialty);

        let sql = format!(
            "UPDATE doctors SET name = ?, specialty = ? WHERE id = ? RETURNING {}",
            DOCTOR_COLUMNS
        );

        let row = sqlx::query_as::<_, DoctorRow>(&sql)
            .bind(&name)
            .bind(&specialty)
            .bind(doctor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        info!("Doctor {} updated", doctor_id);
        Ok(row.into())
    }

    pub async fn delete_doctor(&self, doctor_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = ?")
            .bind(doctor_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Doctor not found".to_string()));
        }

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }
}

async fn insert_doctor<'e, E>(
    executor: E,
    name: &str,
    specialty: Option<&str>,
    user_id: Option<i64>,
) -> Result<DoctorRow, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "INSERT INTO doctors (name, specialty, user_id) VALUES (?, ?, ?) RETURNING {}",
        DOCTOR_COLUMNS
    );

    sqlx::query_as::<_, DoctorRow>(&sql)
        .bind(name)
        .bind(specialty)
        .bind(user_id)
        .fetch_one(executor)
        .await
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
