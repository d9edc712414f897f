//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKPILE_STORAGE_BACKEND=memory                                   │
//! │     STOCKPILE_DB_PATH=/tmp/stockpile.db                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockpile/config.toml (Linux)                            │
//! │     ~/Library/Application Support/com.stockpile.stockpile/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SQLite in the platform data dir, "$" with 2 decimals               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! backend = "sqlite"          # sqlite | memory
//! path = "/data/stockpile.db" # optional, defaults to the platform data dir
//! max_connections = 5
//!
//! [display]
//! currency_symbol = "$"
//! currency_decimals = 2
//!
//! [logging]
//! filter = "info,stockpile=debug"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Default `EnvFilter` directive when neither `RUST_LOG` nor the config
/// file sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,stockpile=debug,sqlx=warn";

const MAX_CURRENCY_DECIMALS: u8 = 6;

// =============================================================================
// Storage Backend
// =============================================================================

/// Which `KeyValueStore` implementation backs the inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite file on disk.
    #[default]
    Sqlite,
    /// Process memory; nothing survives a restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database file. `None` uses `<data dir>/stockpile.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; `RUST_LOG` still wins when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

// =============================================================================
// AppConfig
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or the platform config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Sqlite && self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_connections must be greater than 0".into(),
            ));
        }

        if self.display.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "display.currency_decimals must be at most {}",
                MAX_CURRENCY_DECIMALS
            )));
        }

        Ok(())
    }

    /// Applies `STOCKPILE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup` (environment variable name → value).
    ///
    /// ## Variables
    /// - `STOCKPILE_STORAGE_BACKEND`: `sqlite` or `memory`
    /// - `STOCKPILE_DB_PATH`: database file
    /// - `STOCKPILE_MAX_CONNECTIONS`: pool size
    /// - `STOCKPILE_CURRENCY_SYMBOL`: display symbol
    /// - `STOCKPILE_LOG`: log filter directive
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("STOCKPILE_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(e) => warn!(backend = %backend, "{}", e),
            }
        }

        if let Some(path) = lookup("STOCKPILE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(max) = lookup("STOCKPILE_MAX_CONNECTIONS") {
            if let Ok(m) = max.parse::<u32>() {
                self.storage.max_connections = m;
            }
        }

        if let Some(symbol) = lookup("STOCKPILE_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Some(filter) = lookup("STOCKPILE_LOG") {
            self.logging.filter = Some(filter);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Database file to open for the SQLite backend.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join("stockpile.db"))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Log filter directive from config, or the built-in default.
    pub fn log_filter(&self) -> &str {
        self.logging.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use stockpile_app::state::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234.5), "$1234.50");
    /// ```
    pub fn format_currency(&self, amount: f64) -> String {
        let decimals = usize::from(self.display.currency_decimals);
        let digits = format!("{:.*}", decimals, amount.abs());
        // -0.001 rounds to "0.00", which should not carry a sign
        let is_zero = digits.chars().all(|c| c == '0' || c == '.');
        let sign = if amount < 0.0 && !is_zero { "-" } else { "" };

        format!("{}{}{}", sign, self.display.currency_symbol, digits)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stockpile", "stockpile")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [storage]
            backend = "memory"

            [display]
            currency_symbol = "€"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.display.currency_symbol, "€");
        assert_eq!(config.display.currency_decimals, 2);
        assert!(config.logging.filter.is_none());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("[storage]\nbackend = \"floppy\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.storage.max_connections = 0;
        assert!(config.validate().is_err());

        config.storage.backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());

        config.display.currency_decimals = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STOCKPILE_STORAGE_BACKEND", "memory"),
            ("STOCKPILE_DB_PATH", "/tmp/override.db"),
            ("STOCKPILE_MAX_CONNECTIONS", "not-a-number"),
            ("STOCKPILE_LOG", "warn"),
        ]);

        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/override.db"));
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn test_unknown_backend_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| {
            (name == "STOCKPILE_STORAGE_BACKEND").then(|| "tape".to_string())
        });
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir()
            .join(format!("stockpile-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = AppConfig::load_or_default(Some(path));
        assert_eq!(config.display, DisplaySettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("stockpile-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[display]\ncurrency_decimals = 0\n").unwrap();

        let config = AppConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.display.currency_decimals, 0);
        assert_eq!(config.format_currency(12.6), "$13");
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(49.95), "$49.95");
        assert_eq!(config.format_currency(0.0), "$0.00");
        assert_eq!(config.format_currency(1.005e3), "$1005.00");
        assert_eq!(config.format_currency(-12.34), "-$12.34");
        assert_eq!(config.format_currency(-0.001), "$0.00");
    }
}
