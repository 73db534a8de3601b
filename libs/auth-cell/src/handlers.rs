use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_database::{db_error, AppState};
use shared_models::auth::{AuthUser, LoginRequest, LoginResponse, Role, TokenResponse};
use shared_models::error::AppError;
use shared_utils::extractor::{ApiJson, ApiPath};
use shared_utils::jwt::issue_token;

use crate::models::{require_credentials, CreateUserRequest, RegisterRequest, UserList};
use crate::services::account::create_account;
use crate::services::password::PasswordService;
use crate::services::users::UserRepository;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (username, password) = require_credentials(request.username, request.password)?;
    debug!("Login attempt for {}", username);

    let row = UserRepository::find_by_username(&state.pool, &username)
        .await
        .map_err(db_error)?;

    // Unknown user and wrong password are indistinguishable to the caller.
    let Some(row) = row else {
        PasswordService::verify_dummy(&password);
        warn!("Login failed for {}", username);
        return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    };

    if !PasswordService::verify_password(&password, &row.password_hash)? {
        warn!("Login failed for {}", username);
        return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let user = row.into_user()?;
    let token = issue_token(
        user.id,
        &user.username,
        user.role,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    info!("User {} logged in", user.id);
    Ok(Json(LoginResponse { token, user }))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (username, password) = require_credentials(request.username, request.password)?;

    let user = create_account(&state.pool, &username, &password, Role::Patient).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user,
        })),
    ))
}

/// Confirms the credential and that its subject still exists.
#[axum::debug_handler]
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<TokenResponse>, AppError> {
    let row = UserRepository::find_by_id(&state.pool, caller.id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let user = row.into_user()?;

    Ok(Json(TokenResponse {
        valid: true,
        user: AuthUser::from(&user),
    }))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<Value>, AppError> {
    if caller.role != Role::Admin && caller.id != user_id {
        return Err(AppError::Forbidden {
            required: vec![Role::Admin],
            actual: caller.role,
        });
    }

    let user = UserRepository::find_by_id(&state.pool, user_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
        .into_user()?;

    Ok(Json(json!(user)))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (username, password) = require_credentials(request.username, request.password)?;

    let role = match request.role.as_deref() {
        None => Role::FrontDesk,
        Some(raw) => match raw.parse::<Role>() {
            Ok(role @ (Role::Admin | Role::FrontDesk)) => role,
            _ => {
                return Err(AppError::Validation(
                    "Role must be admin or front_desk".to_string(),
                ))
            }
        },
    };

    let user = create_account(&state.pool, &username, &password, role).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": user,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<UserList>, AppError> {
    let users = UserRepository::list(&state.pool)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(|row| row.into_user())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(UserList {
        total: users.len(),
        users,
    }))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<Value>, AppError> {
    if caller.id == user_id {
        return Err(AppError::BusinessRule(
            "You cannot delete your own user".to_string(),
        ));
    }

    if !UserRepository::delete(&state.pool, user_id)
        .await
        .map_err(db_error)?
    {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    info!("User {} deleted by {}", user_id, caller.id);
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
