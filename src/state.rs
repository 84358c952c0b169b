use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::store::{DataSource, FixtureStore, PgStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataSource>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn DataSource> = match &config.backend {
            StoreBackend::Postgres { database_url } => {
                let pg = PgStore::connect(database_url).await?;
                if let Err(e) = pg.migrate().await {
                    tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
                }
                tracing::info!("using postgres data source");
                Arc::new(pg)
            }
            StoreBackend::Fixture => {
                tracing::info!("using in-memory fixture data source");
                Arc::new(FixtureStore::seeded())
            }
        };

        Ok(Self { store, config })
    }

    /// State backed by the seeded fixture store, for tests.
    pub fn fixture() -> Self {
        Self {
            store: Arc::new(FixtureStore::seeded()),
            config: Arc::new(AppConfig {
                backend: StoreBackend::Fixture,
                host: "127.0.0.1".into(),
                port: 0,
            }),
        }
    }
}
