use sqlx::{Executor, Sqlite};
use tracing::{debug, info};

use shared_database::{db_error, is_unique_violation};
use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::services::password::PasswordService;
use crate::services::users::UserRepository;

/// Create a user with a hashed password. Runs on a pool or inside a caller's
/// transaction, so doctor and patient creation can link the account atomically.
pub async fn create_account<'e, E>(
    executor: E,
    username: &str,
    password: &str,
    role: Role,
) -> Result<User, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!("Creating {} account for {}", role, username);

    let password_hash = PasswordService::hash_password(password)?;

    let row = UserRepository::insert(executor, username, &password_hash, role)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Username {} already exists", username))
            } else {
                db_error(e)
            }
        })?;

    info!("Created user {} with role {}", row.id, role);
    row.into_user()
}
