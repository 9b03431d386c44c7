//! Configuration file management.
//!
//! A TOML file supplies every setting; each has a default so an empty or
//! missing file is valid. A handful of environment variables override the
//! file after it is read.

use std::path::PathBuf;

use mystash_db::StoreKind;
use serde::{Deserialize, Serialize};

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store locations.
    #[serde(default)]
    pub databases: DatabaseConfig,
    /// Log level and request logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix every route is mounted under, without slashes.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Reported by the health endpoints.
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Store locations. Empty paths resolve to `<data_dir>/<store>.db`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
    #[serde(default)]
    pub auth_path: String,
    #[serde(default)]
    pub service_path: String,
    #[serde(default)]
    pub dev_path: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit one event per handled request.
    #[serde(default = "default_true")]
    pub log_requests: bool,
    /// Routes (relative to the prefix) never logged by the request logger.
    #[serde(default = "default_exclude_routes")]
    pub exclude_routes: Vec<String>,
}

// Default value functions

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_prefix() -> String {
    "v1".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_exclude_routes() -> Vec<String> {
    vec!["/health".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            prefix: default_prefix(),
            environment: default_environment(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_requests: true,
            exclude_routes: default_exclude_routes(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from the config file, then apply environment
    /// overrides.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from the environment, read through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(port) = var("PORT") {
            self.server.port = port.trim().parse()?;
        }
        if let Some(env) = var("MYSTASH_ENV").or_else(|| var("NODE_ENV")) {
            self.server.environment = env;
        }
        if let Some(path) = var("AUTH_DATABASE_URL") {
            self.databases.auth_path = path;
        }
        if let Some(path) = var("SERVICE_DATABASE_URL") {
            self.databases.service_path = path;
        }
        if let Some(path) = var("DEV_DATABASE_URL") {
            self.databases.dev_path = path;
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.databases.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.databases.data_dir)
        }
    }

    /// Where the given store lives on disk.
    pub fn store_path(&self, kind: StoreKind) -> PathBuf {
        let configured = match kind {
            StoreKind::Auth => &self.databases.auth_path,
            StoreKind::Service => &self.databases.service_path,
            StoreKind::Dev => &self.databases.dev_path,
        };
        if configured.is_empty() {
            self.data_dir().join(kind.file_name())
        } else {
            PathBuf::from(configured)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("MYSTASH_CONFIG") {
            return PathBuf::from(path);
        }
        Self::default_data_dir().join("config.toml")
    }

    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("MYSTASH_DATA_DIR") {
            return PathBuf::from(dir);
        }
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".mystash"))
            .unwrap_or_else(|_| PathBuf::from("/tmp/mystash"))
    }
}
