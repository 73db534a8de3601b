use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Appointment status state machine:
/// SCHEDULED -> SCHEDULED | COMPLETED | CANCELLED. COMPLETED and CANCELLED are terminal.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    /// Rejects any mutation of a terminal appointment, whatever the field.
    pub fn ensure_mutable(current: AppointmentStatus) -> Result<(), AppointmentError> {
        if current.is_terminal() {
            warn!("Attempt to modify {} appointment", current);
            return Err(AppointmentError::Immutable(current));
        }
        Ok(())
    }

    pub fn valid_transitions(current: AppointmentStatus) -> &'static [AppointmentStatus] {
        match current {
            AppointmentStatus::Scheduled => &[
                AppointmentStatus::Scheduled,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
        }
    }

    pub fn validate_status_transition(
        current: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition {} -> {}", current, next);

        Self::ensure_mutable(current)?;

        if !Self::valid_transitions(current).contains(&next) {
            return Err(AppointmentError::InvalidTransition { from: current, to: next });
        }

        Ok(())
    }
}
