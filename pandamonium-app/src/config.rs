//! Application configuration
//!
//! Loaded from a YAML file next to the instance. The secret key signs the
//! clients' session cookies at the HTTP layer; "dev" is only acceptable in
//! development and the default config says so explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pandamonium_core::{ConfigError, PandaError, PandaResult};

/// Store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file.
    pub path: PathBuf,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Secret used to sign session cookies.
    pub secret_key: String,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Development defaults: local database file, "dev" secret.
    pub fn dev() -> Self {
        Self {
            secret_key: "dev".to_string(),
            database: DatabaseConfig {
                path: PathBuf::from("pandamonium.db"),
            },
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml(text: &str) -> PandaResult<Self> {
        let config: Self = serde_yaml::from_str(text).map_err(|error| {
            PandaError::Config(ConfigError::Unreadable {
                reason: error.to_string(),
            })
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load and parse a YAML configuration file.
    pub fn load(path: &Path) -> PandaResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| {
            PandaError::Config(ConfigError::Unreadable {
                reason: format!("{}: {}", path.display(), error),
            })
        })?;

        Self::from_yaml(&text)
    }

    /// Check the configuration values.
    pub fn validate(&self) -> PandaResult<()> {
        if self.secret_key.is_empty() {
            return Err(PandaError::Config(ConfigError::MissingRequired {
                field: "secret_key",
            }));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(PandaError::Config(ConfigError::MissingRequired {
                field: "database.path",
            }));
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
