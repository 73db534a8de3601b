use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, TokenResponse};
use shared_models::clinic::{Center, Doctor, DoctorList, Patient, PatientList};
use shared_models::error::AppError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityClientError {
    /// The Identity Service rejected the forwarded credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Network failure, timeout or a 5xx from the Identity Service.
    #[error("Identity service unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected response from identity service: {0}")]
    UnexpectedResponse(String),
}

impl From<IdentityClientError> for AppError {
    fn from(err: IdentityClientError) -> Self {
        match err {
            IdentityClientError::Unauthorized(msg) => AppError::Auth(msg),
            other => AppError::DependencyUnavailable(other.to_string()),
        }
    }
}

/// Read access to the reference data owned by the Identity Service.
///
/// Every call forwards the caller's bearer token unchanged. Lookups return
/// `Ok(None)` when the entity does not exist, which callers must keep distinct
/// from the dependency being unreachable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityClient: Send + Sync {
    async fn validate_token(&self, token: &str) -> Result<AuthUser, IdentityClientError>;

    async fn get_doctor(&self, token: &str, doctor_id: i64) -> Result<Option<Doctor>, IdentityClientError>;

    async fn get_center(&self, token: &str, center_id: i64) -> Result<Option<Center>, IdentityClientError>;

    async fn get_patient(&self, token: &str, patient_id: i64) -> Result<Option<Patient>, IdentityClientError>;

    async fn list_doctors(&self, token: &str) -> Result<Vec<Doctor>, IdentityClientError>;

    async fn list_patients(&self, token: &str) -> Result<Vec<Patient>, IdentityClientError>;
}

pub struct HttpIdentityClient {
    client: Client,
    base_url: String,
}

impl HttpIdentityClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, IdentityClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityClientError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, IdentityClientError> {
        Self::new(
            config.identity_base_url(),
            Duration::from_secs(config.identity_timeout_secs),
        )
    }

    async fn fetch<T>(&self, path: &str, token: &str) -> Result<Option<T>, IdentityClientError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Calling identity service: GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                error!("Identity service request to {} failed: {}", url, e);
                IdentityClientError::Unavailable(if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    "connection failed".to_string()
                })
            })?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let message = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| body["error"].as_str().map(str::to_string))
                    .unwrap_or_else(|| "Credential rejected by identity service".to_string());
                warn!("Identity service rejected credential ({}): {}", status, message);
                Err(IdentityClientError::Unauthorized(message))
            }
            s if s.is_success() => response.json::<T>().await.map(Some).map_err(|e| {
                error!("Failed to decode identity response from {}: {}", url, e);
                IdentityClientError::UnexpectedResponse(format!("undecodable body from {}", path))
            }),
            s => {
                error!("Identity service returned {} for {}", s, url);
                Err(IdentityClientError::Unavailable(format!("status {}", s)))
            }
        }
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn validate_token(&self, token: &str) -> Result<AuthUser, IdentityClientError> {
        let response: TokenResponse = self
            .fetch("/auth/validate", token)
            .await?
            .ok_or_else(|| IdentityClientError::UnexpectedResponse("validate endpoint missing".to_string()))?;

        if !response.valid {
            return Err(IdentityClientError::Unauthorized("Invalid token".to_string()));
        }

        Ok(response.user)
    }

    async fn get_doctor(&self, token: &str, doctor_id: i64) -> Result<Option<Doctor>, IdentityClientError> {
        self.fetch(&format!("/admin/doctors/{}", doctor_id), token).await
    }

    async fn get_center(&self, token: &str, center_id: i64) -> Result<Option<Center>, IdentityClientError> {
        self.fetch(&format!("/admin/centers/{}", center_id), token).await
    }

    async fn get_patient(&self, token: &str, patient_id: i64) -> Result<Option<Patient>, IdentityClientError> {
        self.fetch(&format!("/admin/patients/{}", patient_id), token).await
    }

    async fn list_doctors(&self, token: &str) -> Result<Vec<Doctor>, IdentityClientError> {
        let list: Option<DoctorList> = self.fetch("/admin/doctors", token).await?;
        Ok(list.map(|l| l.doctors).unwrap_or_default())
    }

    async fn list_patients(&self, token: &str) -> Result<Vec<Patient>, IdentityClientError> {
        let list: Option<PatientList> = self.fetch("/admin/patients", token).await?;
        Ok(list.map(|l| l.patients).unwrap_or_default())
    }
}
