use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use shared_models::auth::Role;

use crate::models::UserRow;

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at";

pub struct UserRepository;

impl UserRepository {
    /// Accepts a pool or an open transaction.
    pub async fn insert<'e, E>(
        executor: E,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<UserRow, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .bind(password_hash)
            .bind(role.as_str())
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRow>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<UserRow>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql).fetch_all(pool).await
    }

    /// Returns whether a row was removed.
    pub async fn delete(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
