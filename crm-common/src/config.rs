//! Configuration loading and database path resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the SQLite database file
pub const DATABASE_ENV_VAR: &str = "CRM_DATABASE";

/// File name of the database inside the data directory
const DATABASE_FILE_NAME: &str = "crm.db";

/// Settings read from `config.toml`
///
/// Every key is optional. A missing file or key falls back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// SQLite database file
    pub database_path: Option<PathBuf>,
    /// Default tracing directive (e.g. "info", "crm_import=debug")
    pub log_level: String,
    /// Contact type applied to imports when none is given on the command line
    pub contact_type: Option<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: "info".to_string(),
            contact_type: None,
        }
    }
}

impl ToolConfig {
    /// Parse a config file, failing on I/O or TOML errors
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the config, or the defaults when there is no config file
    ///
    /// With no explicit path the platform config file is tried. A file that
    /// exists but cannot be read or parsed is an error, so callers can
    /// report it once logging is up.
    pub fn try_load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config = Self::load(&path).map_err(|e| match e {
            Error::Io(io) => Error::Config(format!("{}: {}", path.display(), io)),
            other => other,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config, degrading to defaults when it is missing or malformed
    pub fn load_or_default(path: Option<&Path>) -> Self {
        Self::try_load_or_default(path).unwrap_or_else(|e| {
            warn!("Ignoring config file, using defaults: {}", e);
            Self::default()
        })
    }
}

/// Platform config file path (`<config dir>/crm/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("crm").join("config.toml"))
}

/// OS-dependent default database path
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("crm"))
        .unwrap_or_else(|| PathBuf::from("./crm_data"))
        .join(DATABASE_FILE_NAME)
}

/// Database path resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `CRM_DATABASE` environment variable
/// 3. `database_path` from the TOML config
/// 4. OS-dependent compiled default (fallback)
#[derive(Debug, Clone)]
pub struct DatabasePathResolver {
    cli_arg: Option<PathBuf>,
    config: ToolConfig,
}

impl DatabasePathResolver {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            cli_arg: None,
            config,
        }
    }

    /// Set the command-line override
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.config.database_path {
            return path.clone();
        }

        default_database_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_ends_with_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("crm/crm.db") || path.ends_with("crm_data/crm.db"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ToolConfig = toml::from_str("contact_type = \"Household\"").unwrap();
        assert_eq!(config.contact_type.as_deref(), Some("Household"));
        assert_eq!(config.log_level, "info");
        assert!(config.database_path.is_none());
    }
}
