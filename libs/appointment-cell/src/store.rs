use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

/// The partial unique index is the storage-level guarantee behind slot
/// exclusivity: cancelled rows never occupy a slot.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        scheduled_at TEXT NOT NULL,
        reason TEXT,
        status TEXT NOT NULL DEFAULT 'SCHEDULED'
            CHECK (status IN ('SCHEDULED', 'COMPLETED', 'CANCELLED')),
        patient_id INTEGER NOT NULL,
        doctor_id INTEGER NOT NULL,
        center_id INTEGER NOT NULL,
        registered_by INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_doctor_slot
        ON appointments (doctor_id, scheduled_at)
        WHERE status <> 'CANCELLED'
    "#,
    "CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments (patient_id)",
];

const APPOINTMENT_COLUMNS: &str = "id, scheduled_at, reason, status, patient_id, doctor_id, \
     center_id, registered_by, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: i64,
    pub scheduled_at: NaiveDateTime,
    pub reason: Option<String>,
    pub status: String,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub center_id: i64,
    pub registered_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = AppointmentError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<AppointmentStatus>()
            .map_err(|_| AppointmentError::Database(format!("Appointment {} has unknown status {}", row.id, row.status)))?;

        Ok(Appointment {
            id: row.id,
            timestamp: row.scheduled_at,
            reason: row.reason,
            status,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            center_id: row.center_id,
            registered_by: row.registered_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub timestamp: NaiveDateTime,
    pub reason: Option<String>,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub center_id: i64,
    pub registered_by: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub doctor_id: Option<i64>,
    pub center_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
}

pub struct AppointmentStore;

impl AppointmentStore {
    pub async fn insert(pool: &SqlitePool, new: &NewAppointment) -> Result<AppointmentRow, sqlx::Error> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO appointments \
             (scheduled_at, reason, status, patient_id, doctor_id, center_id, registered_by, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            APPOINTMENT_COLUMNS
        );

        sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(new.timestamp)
            .bind(&new.reason)
            .bind(AppointmentStatus::Scheduled.as_str())
            .bind(new.patient_id)
            .bind(new.doctor_id)
            .bind(new.center_id)
            .bind(new.registered_by)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<AppointmentRow>, sqlx::Error> {
        let sql = format!("SELECT {} FROM appointments WHERE id = ?", APPOINTMENT_COLUMNS);

        sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Id of a non-cancelled appointment holding the exact slot, if any.
    pub async fn find_active_at(
        pool: &SqlitePool,
        doctor_id: i64,
        timestamp: NaiveDateTime,
        exclude_id: Option<i64>,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM appointments \
             WHERE doctor_id = ? AND scheduled_at = ? AND status <> 'CANCELLED' \
             AND (? IS NULL OR id <> ?) \
             LIMIT 1",
        )
        .bind(doctor_id)
        .bind(timestamp)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await
    }

    /// Newest first.
    pub async fn list(pool: &SqlitePool, filter: &AppointmentFilter) -> Result<Vec<AppointmentRow>, sqlx::Error> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM appointments WHERE 1 = 1",
            APPOINTMENT_COLUMNS
        ));

        if let Some(doctor_id) = filter.doctor_id {
            query.push(" AND doctor_id = ").push_bind(doctor_id);
        }
        if let Some(center_id) = filter.center_id {
            query.push(" AND center_id = ").push_bind(center_id);
        }
        if let Some(patient_id) = filter.patient_id {
            query.push(" AND patient_id = ").push_bind(patient_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(date) = filter.date {
            query.push(" AND date(scheduled_at) = ").push_bind(date);
        }

        query.push(" ORDER BY scheduled_at DESC, id DESC");

        query.build_query_as::<AppointmentRow>().fetch_all(pool).await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        timestamp: NaiveDateTime,
        reason: Option<&str>,
        status: AppointmentStatus,
    ) -> Result<AppointmentRow, sqlx::Error> {
        let sql = format!(
            "UPDATE appointments SET scheduled_at = ?, reason = ?, status = ?, updated_at = ? \
             WHERE id = ? RETURNING {}",
            APPOINTMENT_COLUMNS
        );

        sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(timestamp)
            .bind(reason)
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Non-cancelled slot times of one doctor on one day, ascending.
    pub async fn occupied_on(
        pool: &SqlitePool,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<NaiveDateTime>, sqlx::Error> {
        sqlx::query_scalar::<_, NaiveDateTime>(
            "SELECT scheduled_at FROM appointments \
             WHERE doctor_id = ? AND date(scheduled_at) = ? AND status <> 'CANCELLED' \
             ORDER BY scheduled_at ASC",
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_all(pool)
        .await
    }
}
