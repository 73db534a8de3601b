use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{AppointmentError, DoctorAvailability};
use crate::store::AppointmentStore;

pub struct AvailabilityService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AvailabilityService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Occupied `HH:MM` slots of a doctor on a date. Read-only and advisory:
    /// the conflict check at write time remains authoritative.
    pub async fn occupied_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<DoctorAvailability, AppointmentError> {
        let occupied_slots: Vec<String> = AppointmentStore::occupied_on(self.pool, doctor_id, date)
            .await?
            .into_iter()
            .map(|ts| ts.format("%H:%M").to_string())
            .collect();

        Ok(DoctorAvailability {
            doctor_id,
            date,
            total: occupied_slots.len(),
            occupied_slots,
        })
    }
}
