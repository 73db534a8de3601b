use std::sync::Arc;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    match auth_value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::Auth("Invalid authorization header format".to_string())),
    }
}

/// Authentication stage: validates the credential locally and stores the
/// subject in the request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = validate_token(bearer_token(request.headers())?, &config.jwt_secret)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Allow-list consumed by [`require_roles`].
#[derive(Debug, Clone, Copy)]
pub struct RequiredRoles(pub &'static [Role]);

pub const ADMIN_ONLY: RequiredRoles = RequiredRoles(&[Role::Admin]);
pub const ADMIN_OR_FRONT_DESK: RequiredRoles = RequiredRoles(&[Role::Admin, Role::FrontDesk]);

/// Authorization stage: must run after an authentication stage.
pub async fn require_roles(
    State(required): State<RequiredRoles>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))?;

    if !user.has_role(required.0) {
        return Err(AppError::Forbidden {
            required: required.0.to_vec(),
            actual: user.role,
        });
    }

    Ok(next.run(request).await)
}

/// `Json` extractor whose rejections are reported as validation failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(ApiJson(value))
    }
}

/// `Path` extractor whose rejections are reported as validation failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(ApiPath(value))
    }
}

/// `Query` extractor whose rejections are reported as validation failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(ApiQuery(value))
    }
}
