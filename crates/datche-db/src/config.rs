//! # Ledger Configuration
//!
//! Where the ledger keeps its database and how the stock page behaves.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     DATCHE_DB_PATH=/srv/stand/datche.db                                 │
//! │     DATCHE_LOW_STOCK_THRESHOLD=3                                        │
//! │     DATCHE_INITIAL_STOCK=20                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/datche-pos/ledger.toml (Linux)                            │
//! │     ~/Library/Application Support/com.datche.pos/ledger.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     database in the platform data dir, threshold 5, no opening stock    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # ledger.toml
//! [database]
//! path = "/srv/stand/datche.db"
//! max_connections = 5
//!
//! [stock]
//! low_threshold = 5
//! initial_quantity = 20
//! ```

use datche_core::DEFAULT_LOW_STOCK_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::pool::DbConfig;

const CONFIG_FILE_NAME: &str = "ledger.toml";
const DATABASE_FILE_NAME: &str = "datche.db";

// =============================================================================
// Database Settings
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Stock Settings
// =============================================================================

/// `[stock]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSettings {
    /// Below this many units a product is flagged low.
    #[serde(default = "default_low_threshold")]
    pub low_threshold: i64,

    /// Units the `seed` binary gives every stocked product. `None` leaves
    /// stock untouched.
    #[serde(default)]
    pub initial_quantity: Option<i64>,
}

fn default_low_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl Default for StockSettings {
    fn default() -> Self {
        StockSettings {
            low_threshold: default_low_threshold(),
            initial_quantity: None,
        }
    }
}

// =============================================================================
// Main Ledger Configuration
// =============================================================================

/// Complete ledger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub stock: StockSettings,
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (ledger.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading ledger config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
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
            warn!("Failed to load ledger config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a `ledger.toml` document.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Ledger config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.stock.low_threshold < 0 {
            return Err(ConfigError::Invalid(
                "low_threshold cannot be negative".into(),
            ));
        }

        if let Some(quantity) = self.stock.initial_quantity {
            if quantity < 0 {
                return Err(ConfigError::Invalid(format!(
                    "initial_quantity cannot be negative, got: {}",
                    quantity
                )));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `DATCHE_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("DATCHE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(threshold) = lookup("DATCHE_LOW_STOCK_THRESHOLD") {
            match threshold.parse::<i64>() {
                Ok(t) => self.stock.low_threshold = t,
                Err(_) => warn!(value = %threshold, "Ignoring invalid DATCHE_LOW_STOCK_THRESHOLD"),
            }
        }

        if let Some(quantity) = lookup("DATCHE_INITIAL_STOCK") {
            match quantity.parse::<i64>() {
                Ok(q) => self.stock.initial_quantity = Some(q),
                Err(_) => warn!(value = %quantity, "Ignoring invalid DATCHE_INITIAL_STOCK"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "datche", "pos")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// SQLite file to open: the configured path, else the platform data
    /// directory, else the working directory.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("com", "datche", "pos")
                    .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            })
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Pool configuration for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path()).max_connections(self.database.max_connections)
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.stock.low_threshold
    }
}
