use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{AuthUser, Claims, Role};
use shared_models::error::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Token lifetime of {0} hours is out of range")]
    InvalidTtl(i64),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => AppError::Internal(msg),
            TokenError::MissingSecret | TokenError::InvalidTtl(_) => AppError::Internal(err.to_string()),
            other => AppError::Auth(other.to_string()),
        }
    }
}

/// Mint a signed credential for the given subject. Expiry is always set.
pub fn issue_token(
    user_id: i64,
    username: &str,
    role: Role,
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<String, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let now = Utc::now();
    let expires_at = Duration::try_hours(ttl_hours)
        .filter(|_| ttl_hours > 0)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(TokenError::InvalidTtl(ttl_hours))?;

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify signature and expiry of a credential and return its subject.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthUser, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            debug!("Token expired");
            TokenError::Expired
        }
        ErrorKind::InvalidSignature => {
            debug!("Token signature verification failed");
            TokenError::Invalid("signature mismatch".to_string())
        }
        _ => {
            debug!("Failed to decode token: {}", e);
            TokenError::Invalid("malformed token".to_string())
        }
    })?;

    let user = AuthUser::from(data.claims);
    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}
