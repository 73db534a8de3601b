use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::models::AppointmentError;
use crate::store::AppointmentStore;

/// Exact-timestamp exclusivity check for a doctor's slot. Cancelled
/// appointments never conflict. The unique index on the table closes the
/// window between this check and the write.
pub struct ConflictChecker<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ConflictChecker<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_slot_free(
        &self,
        doctor_id: i64,
        timestamp: NaiveDateTime,
        exclude_appointment_id: Option<i64>,
    ) -> Result<(), AppointmentError> {
        debug!("Checking slot {} for doctor {}", timestamp, doctor_id);

        if let Some(existing) =
            AppointmentStore::find_active_at(self.pool, doctor_id, timestamp, exclude_appointment_id).await?
        {
            warn!(
                "Slot {} for doctor {} already held by appointment {}",
                timestamp, doctor_id, existing
            );
            return Err(AppointmentError::SlotTaken { doctor_id, timestamp });
        }

        Ok(())
    }
}
