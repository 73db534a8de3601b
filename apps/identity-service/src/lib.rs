pub mod router;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use shared_config::AppConfig;
use shared_database::{apply_schema, create_pool, AppState};

pub use router::create_router;

/// Every table owned by the Identity Service, in dependency order.
pub const SCHEMAS: &[&[&str]] = &[
    auth_cell::SCHEMA,
    doctor_cell::SCHEMA,
    patient_cell::SCHEMA,
    center_cell::SCHEMA,
];

/// Open the database, apply all schemas and build the shared state.
pub async fn init_state(config: AppConfig) -> Result<Arc<AppState>> {
    let pool = create_pool(&config.database_url, 5)
        .await
        .with_context(|| format!("opening database {}", config.database_url))?;

    for schema in SCHEMAS {
        apply_schema(&pool, schema).await.context("applying identity schema")?;
    }

    info!("Identity database ready at {}", config.database_url);
    Ok(AppState::new(Arc::new(config), pool))
}
