pub mod router;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use appointment_cell::{HttpIdentityClient, IdentityClient, SchedulingState};
use shared_config::AppConfig;
use shared_database::{apply_schema, create_pool};

pub use router::create_router;

/// Open the appointment database and wire the HTTP identity client.
pub async fn init_state(config: AppConfig) -> Result<Arc<SchedulingState>> {
    let pool = create_pool(&config.database_url, 5)
        .await
        .with_context(|| format!("opening database {}", config.database_url))?;

    apply_schema(&pool, appointment_cell::SCHEMA)
        .await
        .context("applying scheduling schema")?;

    let identity: Arc<dyn IdentityClient> = Arc::new(
        HttpIdentityClient::from_config(&config).context("building identity client")?,
    );
    info!(
        "Scheduling database ready at {}, identity service at {}",
        config.database_url,
        config.identity_base_url()
    );

    Ok(SchedulingState::new(Arc::new(config), pool, identity))
}
