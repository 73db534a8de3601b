use tracing::{debug, warn};

use shared_models::clinic::{Center, Doctor, Patient};

use crate::models::AppointmentError;
use crate::services::identity_client::IdentityClient;

#[derive(Debug, Clone)]
pub struct ResolvedReferences {
    pub doctor: Doctor,
    pub center: Center,
    pub patient: Patient,
}

/// Resolves the remote references of a new appointment against the Identity
/// Service, in the order doctor, center, patient. The first failure wins.
pub struct EntityResolver<'a> {
    identity: &'a dyn IdentityClient,
}

impl<'a> EntityResolver<'a> {
    pub fn new(identity: &'a dyn IdentityClient) -> Self {
        Self { identity }
    }

    pub async fn resolve(
        &self,
        token: &str,
        doctor_id: i64,
        center_id: i64,
        patient_id: i64,
    ) -> Result<ResolvedReferences, AppointmentError> {
        debug!(
            "Resolving doctor {}, center {}, patient {}",
            doctor_id, center_id, patient_id
        );

        let doctor = self
            .identity
            .get_doctor(token, doctor_id)
            .await?
            .ok_or(AppointmentError::ReferenceNotFound { entity: "Doctor", id: doctor_id })?;

        let center = self
            .identity
            .get_center(token, center_id)
            .await?
            .ok_or(AppointmentError::ReferenceNotFound { entity: "Center", id: center_id })?;

        let patient = self
            .identity
            .get_patient(token, patient_id)
            .await?
            .ok_or(AppointmentError::ReferenceNotFound { entity: "Patient", id: patient_id })?;

        if !patient.status.is_bookable() {
            warn!("Refusing to book inactive patient {}", patient_id);
            return Err(AppointmentError::InactivePatient(patient_id));
        }

        Ok(ResolvedReferences {
            doctor,
            center,
            patient,
        })
    }
}
