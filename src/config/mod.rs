//! Configuration management.
//!
//! Configuration is read once at startup and never reloaded. Sources are
//! layered in this order, later sources winning:
//!
//! 1. Built-in defaults (a `DynamoDB` Local setup on `localhost:8000`)
//! 2. A TOML file (`--config`, `ITEMSTORE_CONFIG_PATH`, or the platform
//!    config directory)
//! 3. `ITEMSTORE_*` environment variables, including those from a `.env` file
//! 4. Command-line flags, applied by the binary
//!
//! # Example file
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [storage]
//! backend = "dynamodb"
//! endpoint_url = "http://localhost:8000"
//! region = "us-west-2"
//! table_name = "BFS"
//!
//! [logging]
//! format = "json"
//! level = "info"
//! ```

pub mod env;

use crate::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Default listen address for the HTTP server.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
/// Default `DynamoDB` endpoint (`DynamoDB` Local).
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8000";
/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-west-2";
/// Default table name.
pub const DEFAULT_TABLE_NAME: &str = "BFS";
/// Placeholder credential accepted by `DynamoDB` Local.
const DEFAULT_LOCAL_CREDENTIAL: &str = "dummy";
/// Default Prometheus listener port.
pub const DEFAULT_METRICS_PORT: u16 = 9090;

/// Main configuration for itemstore.
#[derive(Debug, Clone, Default)]
pub struct ItemstoreConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Storage backend settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Metrics settings.
    pub metrics: MetricsSettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: SocketAddr,
}

/// Available storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackendKind {
    /// Amazon `DynamoDB` (or `DynamoDB` Local).
    #[default]
    DynamoDb,
    /// Process-local map; data is lost on exit.
    Memory,
}

impl StorageBackendKind {
    /// Parses a backend name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unknown names.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(Self::DynamoDb),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(Error::InvalidInput(format!(
                "unknown storage backend '{other}' (expected 'dynamodb' or 'memory')"
            ))),
        }
    }

    /// Returns the canonical backend name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DynamoDb => "dynamodb",
            Self::Memory => "memory",
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Which backend to use.
    pub backend: StorageBackendKind,
    /// Endpoint override; `None` uses the regional AWS endpoint.
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
    /// Static access key ID; `None` uses the default credential chain.
    pub access_key_id: Option<String>,
    /// Static secret access key.
    pub secret_access_key: Option<SecretString>,
    /// Target table name.
    pub table_name: String,
}

/// Logging settings.
#[derive(Debug, Clone, Default)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// Filter directive, e.g. "info" or "itemstore=debug,tower_http=info".
    pub level: Option<String>,
}

/// Metrics settings.
#[derive(Debug, Clone)]
pub struct MetricsSettings {
    /// Whether the Prometheus exporter is installed.
    pub enabled: bool,
    /// Port for the Prometheus HTTP listener.
    pub port: u16,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Server section.
    pub server: Option<ConfigFileServer>,
    /// Storage section.
    pub storage: Option<ConfigFileStorage>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
    /// Metrics section.
    pub metrics: Option<ConfigFileMetrics>,
}

/// Server section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileServer {
    /// Listen address.
    pub bind: Option<String>,
}

/// Storage section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileStorage {
    /// Backend name.
    pub backend: Option<String>,
    /// Endpoint URL; an empty string clears the default.
    pub endpoint_url: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// Access key ID.
    pub access_key_id: Option<String>,
    /// Secret access key.
    pub secret_access_key: Option<String>,
    /// Table name.
    pub table_name: Option<String>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// Output format.
    pub format: Option<String>,
    /// Filter directive.
    pub level: Option<String>,
}

/// Metrics section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileMetrics {
    /// Whether metrics are enabled.
    pub enabled: Option<bool>,
    /// Listener port.
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            endpoint_url: Some(DEFAULT_ENDPOINT_URL.to_string()),
            region: DEFAULT_REGION.to_string(),
            access_key_id: Some(DEFAULT_LOCAL_CREDENTIAL.to_string()),
            secret_access_key: Some(SecretString::from(DEFAULT_LOCAL_CREDENTIAL.to_string())),
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: DEFAULT_METRICS_PORT,
        }
    }
}

impl ItemstoreConfig {
    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds an
    /// invalid value.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for [`ConfigFile`] or
    /// holds an invalid value.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `itemstore/config.toml` in the platform config directory
    /// (`~/.config/itemstore/` on Linux). Returns defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be loaded.
    pub fn load_default() -> Result<Self> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(Self::default());
        };

        let path = base_dirs.config_dir().join("itemstore").join("config.toml");
        if path.exists() {
            return Self::load_from_file(&path);
        }

        Ok(Self::default())
    }

    /// Converts a `ConfigFile` to `ItemstoreConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(server) = file.server
            && let Some(bind) = server.bind
        {
            config.server.bind = parse_bind(&bind)?;
        }
        if let Some(storage) = file.storage {
            if let Some(backend) = storage.backend {
                config.storage.backend = StorageBackendKind::parse(&backend)?;
            }
            if let Some(endpoint) = storage.endpoint_url {
                config.storage.endpoint_url = non_empty(endpoint);
            }
            if let Some(region) = storage.region {
                config.storage.region = region;
            }
            if let Some(key_id) = storage.access_key_id {
                config.storage.access_key_id = non_empty(key_id);
            }
            if let Some(secret) = storage.secret_access_key {
                config.storage.secret_access_key = non_empty(secret).map(SecretString::from);
            }
            if let Some(table) = storage.table_name {
                config.storage.table_name = table;
            }
        }
        if let Some(logging) = file.logging {
            config.logging.format = logging.format;
            config.logging.level = logging.level;
        }
        if let Some(metrics) = file.metrics {
            if let Some(enabled) = metrics.enabled {
                config.metrics.enabled = enabled;
            }
            if let Some(port) = metrics.port {
                config.metrics.port = port;
            }
        }

        Ok(config)
    }

    /// Applies `ITEMSTORE_*` environment overrides.
    ///
    /// Unparseable values are logged and skipped.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        env::apply_overrides(&mut self, |name| std::env::var(name).ok());
        self
    }

    /// Sets the listen address.
    #[must_use]
    pub const fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.server.bind = bind;
        self
    }

    /// Sets the storage backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: StorageBackendKind) -> Self {
        self.storage.backend = backend;
        self
    }
}

/// Parses a listen address.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the address is not `host:port`.
pub fn parse_bind(s: &str) -> Result<SocketAddr> {
    s.trim()
        .parse()
        .map_err(|e| Error::InvalidInput(format!("invalid bind address '{s}': {e}")))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}
