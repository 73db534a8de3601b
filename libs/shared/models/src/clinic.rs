//! Wire representations of the reference data owned by the Identity Service.
//!
//! The Scheduling Service deserializes the same types from Identity responses,
//! so field names here are part of the inter-service contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    #[default]
    Active,
    Inactive,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "ACTIVE",
            PatientStatus::Inactive => "INACTIVE",
        }
    }

    pub fn is_bookable(&self) -> bool {
        matches!(self, PatientStatus::Active)
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(PatientStatus::Active),
            "INACTIVE" => Ok(PatientStatus::Inactive),
            other => Err(format!("Invalid patient status: {}. Use ACTIVE or INACTIVE", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub status: PatientStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Center {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorList {
    pub total: usize,
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientList {
    pub total: usize,
    pub patients: Vec<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterList {
    pub total: usize,
    pub centers: Vec<Center>,
}
