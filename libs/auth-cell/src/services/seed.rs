use sqlx::SqlitePool;
use tracing::info;

use shared_database::db_error;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::services::account::create_account;
use crate::services::users::UserRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(User),
    AlreadyPresent(User),
}

/// Create the administrator account unless a user with that name exists.
pub async fn ensure_admin(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<SeedOutcome, AppError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Admin username and password are required".to_string(),
        ));
    }

    if let Some(existing) = UserRepository::find_by_username(pool, username)
        .await
        .map_err(db_error)?
    {
        info!("Admin user {} already present, nothing to seed", username);
        return Ok(SeedOutcome::AlreadyPresent(existing.into_user()?));
    }

    let user = create_account(pool, username, password, Role::Admin).await?;
    info!("Seeded admin user {}", user.username);

    Ok(SeedOutcome::Created(user))
}
