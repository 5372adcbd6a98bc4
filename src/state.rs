use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{PgRepository, Repository};
use crate::storage::{self, BlobStore};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn BlobStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let repo = PgRepository::connect(&config.database_url, config.db_max_connections).await?;
        repo.migrate().await?;

        let storage = storage::from_config(&config.blob).await?;

        Ok(Self::from_parts(Arc::new(repo), config, storage))
    }

    pub fn from_parts(
        repo: Arc<dyn Repository>,
        config: Arc<AppConfig>,
        storage: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            repo,
            config,
            storage,
        }
    }
}
