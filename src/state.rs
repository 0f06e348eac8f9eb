use std::sync::Arc;

use crate::auth::repo::{MemoryUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::projects::repo::{MemoryProjectRepo, ProjectRepo};
use crate::storage::{ImageStore, PlaceholderImages};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub projects: Arc<dyn ProjectRepo>,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// PostgreSQL when `DATABASE_URL` is configured, in-memory maps otherwise.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let Some(db_cfg) = config.db.clone() else {
            tracing::warn!("DATABASE_URL not set; data lives in memory and is lost on restart");
            return Ok(Self::in_memory(config));
        };

        let store = PgStore::connect(&db_cfg).await?;
        if let Err(e) = store.migrate().await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }
        tracing::info!("using postgres store");

        let store = Arc::new(store);
        let images = Arc::new(PlaceholderImages::new(&config.placeholder_image_base));
        Ok(Self::from_parts(
            Arc::new(config),
            store.clone(),
            store,
            images,
        ))
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let images = Arc::new(PlaceholderImages::new(&config.placeholder_image_base));
        Self::from_parts(
            Arc::new(config),
            Arc::new(MemoryUserRepo::new()),
            Arc::new(MemoryProjectRepo::new()),
            images,
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        projects: Arc<dyn ProjectRepo>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            config,
            users,
            projects,
            images,
        }
    }

    /// Fresh in-memory state with default config, for tests.
    pub fn fake() -> Self {
        Self::in_memory(AppConfig::default())
    }
}
