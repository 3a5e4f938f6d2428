use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::store::StoreBackend;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded photos
    #[serde(default = "default_photo_path")]
    pub photo_path: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Connection settings for the `database` backend.
///
/// Either `url` is given verbatim, or host/user/password/name are all present.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_photo_path() -> String {
    "data/cache".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_max_connections() -> u32 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            photo_path: default_photo_path(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: None,
            port: default_db_port(),
            user: None,
            password: None,
            name: None,
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// Connection URL for the pool, built from the individual settings unless
    /// an explicit `url` is configured
    pub fn connection_url(&self) -> anyhow::Result<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }

        let missing: Vec<&str> = [
            ("host", self.host.is_none()),
            ("user", self.user.is_none()),
            ("password", self.password.is_none()),
            ("name", self.name.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| key)
        .collect();

        if !missing.is_empty() {
            bail!(
                "database backend selected but database settings are missing: {}",
                missing.join(", ")
            );
        }

        // Presence checked above
        let host = self.host.as_deref().unwrap_or_default();
        let user = self.user.as_deref().unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();
        let name = self.name.as_deref().unwrap_or_default();

        Ok(format!(
            "mysql://{}:{}@{}:{}/{}",
            urlencoding::encode(user),
            urlencoding::encode(password),
            host,
            self.port,
            name
        ))
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        config.ensure_directories()?;
        tracing::info!(
            "Store backend: {}, photo directory: {}",
            config.store.backend,
            config.storage.photo_path
        );
        Ok(config)
    }

    /// Load configuration from config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config: Config = toml::from_str(&content)
                    .with_context(|| format!("Invalid configuration in {}", path))?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    /// Format: INV_CONF_<SECTION>_<KEY>
    fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(val) = lookup("INV_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("INV_CONF_SERVER_PORT") {
            self.server.port = val
                .parse()
                .map_err(|_| anyhow!("INV_CONF_SERVER_PORT is not a valid port: {}", val))?;
        }

        // Storage overrides
        if let Some(val) = lookup("INV_CONF_STORAGE_PHOTO_PATH") {
            self.storage.photo_path = val;
        }

        // Store overrides
        if let Some(val) = lookup("INV_CONF_STORE_BACKEND") {
            self.store.backend = val.parse()?;
        }

        // Database overrides
        if let Some(val) = lookup("INV_CONF_DATABASE_URL") {
            self.database.url = Some(val);
        }
        if let Some(val) = lookup("INV_CONF_DATABASE_HOST") {
            self.database.host = Some(val);
        }
        if let Some(val) = lookup("INV_CONF_DATABASE_PORT") {
            self.database.port = val
                .parse()
                .map_err(|_| anyhow!("INV_CONF_DATABASE_PORT is not a valid port: {}", val))?;
        }
        if let Some(val) = lookup("INV_CONF_DATABASE_USER") {
            self.database.user = Some(val);
        }
        if let Some(val) = lookup("INV_CONF_DATABASE_PASSWORD") {
            self.database.password = Some(val);
        }
        if let Some(val) = lookup("INV_CONF_DATABASE_NAME") {
            self.database.name = Some(val);
        }
        if let Some(val) = lookup("INV_CONF_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = val.parse().map_err(|_| {
                anyhow!("INV_CONF_DATABASE_MAX_CONNECTIONS is not a number: {}", val)
            })?;
        }

        Ok(())
    }

    /// Fail before the listener starts if a required setting is absent
    fn validate(&self) -> anyhow::Result<()> {
        if self.server.host.trim().is_empty() {
            bail!("server host must not be empty");
        }
        if self.storage.photo_path.trim().is_empty() {
            bail!("photo storage path must not be empty");
        }
        if self.store.backend == StoreBackend::Database {
            self.database.connection_url()?;
        }
        Ok(())
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.storage.photo_path).with_context(|| {
            format!("Failed to create photo directory {}", self.storage.photo_path)
        })?;
        Ok(())
    }
}
