use serde::Deserialize;

use shared_models::clinic::Doctor;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DoctorRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub specialty: Option<String>,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Doctor {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            specialty: row.specialty,
        }
    }
}

/// `username` and `password` together create a linked clinician account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
}
