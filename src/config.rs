use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::store::{MongoSettings, StoreConfig};

pub const CONFIG_PATH_ENV: &str = "USER_REGISTRY_CONFIG";
pub const ENV_PREFIX: &str = "USER_REGISTRY";

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// Load from an explicit file path (skipped when absent) plus environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = config::Config::builder();

        if path.exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.request_timeout_secs == 0 {
            bail!("server.request_timeout_secs must be non-zero");
        }
        if self.store.operation_timeout_ms == 0 {
            bail!("store.operation_timeout_ms must be non-zero");
        }

        if matches!(self.store.backend, StoreBackendKind::Mongo) {
            let mongo = &self.store.mongo;
            if mongo.uri.trim().is_empty() {
                bail!("store.mongo.uri must be specified");
            }
            if mongo.database.trim().is_empty() {
                bail!("store.mongo.database must be specified");
            }
            if mongo.collection.trim().is_empty() {
                bail!("store.mongo.collection must be specified");
            }
            if mongo.max_pool_size == 0 {
                bail!("store.mongo.max_pool_size must be at least 1");
            }
            if mongo.min_pool_size > mongo.max_pool_size {
                bail!(
                    "store.mongo.min_pool_size ({}) exceeds max_pool_size ({})",
                    mongo.min_pool_size,
                    mongo.max_pool_size
                );
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: StoreBackendKind,
    pub operation_timeout_ms: u64,
    pub mongo: MongoSection,
}

impl StoreSection {
    pub fn to_runtime(&self) -> StoreConfig {
        match self.backend {
            StoreBackendKind::Memory => StoreConfig::Memory,
            StoreBackendKind::Mongo => {
                let mongo = &self.mongo;
                StoreConfig::Mongo(MongoSettings {
                    uri: mongo.uri.trim().to_string(),
                    database: mongo.database.trim().to_string(),
                    collection: mongo.collection.trim().to_string(),
                    max_pool_size: mongo.max_pool_size,
                    min_pool_size: mongo.min_pool_size,
                    connect_timeout: Duration::from_millis(mongo.connect_timeout_ms),
                    server_selection_timeout: Duration::from_millis(
                        mongo.server_selection_timeout_ms,
                    ),
                    require_on_startup: mongo.require_on_startup,
                })
            }
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Mongo,
            operation_timeout_ms: 5_000,
            mongo: MongoSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoSection {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_ms: u64,
    pub server_selection_timeout_ms: u64,
    pub require_on_startup: bool,
}

impl Default for MongoSection {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "go-mongo-practice".to_string(),
            collection: "user".to_string(),
            max_pool_size: 10,
            min_pool_size: 0,
            connect_timeout_ms: 3_000,
            server_selection_timeout_ms: 3_000,
            require_on_startup: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}
