use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn role(&self) -> Result<Role, AppError> {
        self.role
            .parse()
            .map_err(|e: String| AppError::Internal(format!("Stored user {} has {}", self.id, e)))
    }

    pub fn into_user(self) -> Result<User, AppError> {
        let role = self.role()?;
        Ok(User {
            id: self.id,
            username: self.username,
            role,
            created_at: Some(self.created_at),
        })
    }
}

/// Body of the public self-registration endpoint. Role is never accepted here.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    pub total: usize,
    pub users: Vec<User>,
}

/// Both fields present and non-blank, or a validation error.
pub fn require_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String), AppError> {
    match (username, password) {
        (Some(username), Some(password))
            if !username.trim().is_empty() && !password.is_empty() =>
        {
            Ok((username.trim().to_string(), password))
        }
        _ => Err(AppError::Validation(
            "Username and password are required".to_string(),
        )),
    }
}
