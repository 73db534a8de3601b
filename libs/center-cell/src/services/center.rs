use sqlx::SqlitePool;
use tracing::info;

use shared_database::{db_error, AppState};
use shared_models::clinic::Center;
use shared_models::error::AppError;

use crate::models::{CenterRequest, CenterRow};

const CENTER_COLUMNS: &str = "id, name, address";

pub struct CenterService {
    pool: SqlitePool,
}

impl CenterService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
        }
    }

    pub async fn create_center(&self, request: CenterRequest) -> Result<Center, AppError> {
        let name = non_blank(request.name)
            .ok_or_else(|| AppError::Validation("Name is required".to_string()))?;

        let sql = format!(
            "INSERT INTO centers (name, address) VALUES (?, ?) RETURNING {}",
            CENTER_COLUMNS
        );

        let row = sqlx::query_as::<_, CenterRow>(&sql)
            .bind(&name)
            .bind(non_blank(request.address))
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        info!("Center {} created", row.id);
        Ok(row.into())
    }

    pub async fn list_centers(&self) -> Result<Vec<Center>, AppError> {
        let sql = format!("SELECT {} FROM centers ORDER BY id", CENTER_COLUMNS);

        let rows = sqlx::query_as::<_, CenterRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Center::from).collect())
    }

    pub async fn get_center(&self, center_id: i64) -> Result<Center, AppError> {
        let sql = format!("SELECT {} FROM centers WHERE id = ?", CENTER_COLUMNS);

        sqlx::query_as::<_, CenterRow>(&sql)
            .bind(center_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .map(Center::from)
            .ok_or_else(|| AppError::NotFound("Center not found".to_string()))
    }

    pub async fn update_center(
        &self,
        center_id: i64,
        request: CenterRequest,
    ) -> Result<Center, AppError> {
        let current = self.get_center(center_id).await?;

        let sql = format!(
            "UPDATE centers SET name = ?, address = ? WHERE id = ? RETURNING {}",
            CENTER_COLUMNS
        );

        let row = sqlx::query_as::<_, CenterRow>(&sql)
            .bind(non_blank(request.name).unwrap_or(current.name))
            .bind(non_blank(request.address).or(current.address))
            .bind(center_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        info!("Center {} updated", center_id);
        Ok(row.into())
    }

    pub async fn delete_center(&self, center_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM centers WHERE id = ?")
            .bind(center_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Center not found".to_string()));
        }

        info!("Center {} deleted", center_id);
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
