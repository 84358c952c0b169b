use anyhow::Context;

/// Data source selected once at startup. There is no runtime fallback
/// between backends; a misconfigured store is a startup error.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Fixture,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok();

        let backend = match std::env::var("DATA_BACKEND").ok().as_deref() {
            Some("fixture") => StoreBackend::Fixture,
            Some("postgres") => StoreBackend::Postgres {
                database_url: database_url
                    .context("DATA_BACKEND=postgres requires DATABASE_URL")?,
            },
            Some(other) => anyhow::bail!("unknown DATA_BACKEND: {other}"),
            None => match database_url {
                Some(database_url) => StoreBackend::Postgres { database_url },
                None => StoreBackend::Fixture,
            },
        };

        Ok(Self {
            backend,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
        })
    }
}
