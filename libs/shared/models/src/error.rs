use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::Role;

const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: requires one of {required:?}, caller has {actual}")]
    Forbidden { required: Vec<Role>, actual: Role },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DependencyUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-checkable code included in every error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "AUTHENTICATION_FAILED",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            AppError::Conflict(_) => "CONFLICT",
            AppError::DependencyUnavailable(_) => "DEPENDENCY_UNAVAILABLE",
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to clients. Storage and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BusinessRule(msg)
            | AppError::Conflict(msg)
            | AppError::DependencyUnavailable(msg) => msg.clone(),
            AppError::Forbidden { .. } => {
                "You do not have permission to access this resource".to_string()
            }
            AppError::Database(_) | AppError::Internal(_) => GENERIC_INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, self);
        } else {
            tracing::debug!("Rejected request: {}: {}", status, self);
        }

        let body = match &self {
            AppError::Forbidden { required, actual } => json!({
                "error": self.public_message(),
                "code": self.code(),
                "required_roles": required,
                "actual_role": actual,
            }),
            _ => json!({
                "error": self.public_message(),
                "code": self.code(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
