use std::sync::Arc;

use sqlx::SqlitePool;

use shared_config::AppConfig;

use crate::services::identity_client::IdentityClient;

#[derive(Clone)]
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
    pub identity: Arc<dyn IdentityClient>,
}

impl SchedulingState {
    pub fn new(
        config: Arc<AppConfig>,
        pool: SqlitePool,
        identity: Arc<dyn IdentityClient>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            pool,
            identity,
        })
    }
}
