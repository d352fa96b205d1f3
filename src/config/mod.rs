#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;
use thiserror::Error;

const APP_DIRECTORY: &str = "cuenta-corriente";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file at path: {path} | {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("Invalid config file at path: {path} | {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error
    },
    #[error("Invalid value for [{field}]: {reason}")]
    Invalid {
        field: &'static str,
        reason: String
    }
}

/// Field names used by the initial balance endpoints.
///
/// Two backends are in use with different casing; neither is assumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceFields {
    /// `monto`, `fecha`, `ultimaModificacion`
    #[default]
    Lower,
    /// `Monto`, `Fecha`, `UltimaModificacion`
    Capitalized
}

impl BalanceFields {
    pub fn amount(&self) -> &'static str {
        match self {
            BalanceFields::Lower => "monto",
            BalanceFields::Capitalized => "Monto"
        }
    }

    pub fn date(&self) -> &'static str {
        match self {
            BalanceFields::Lower => "fecha",
            BalanceFields::Capitalized => "Fecha"
        }
    }

    pub fn last_modified(&self) -> &'static str {
        match self {
            BalanceFields::Lower => "ultimaModificacion",
            BalanceFields::Capitalized => "UltimaModificacion"
        }
    }
}

/// Runtime settings. Every field is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the ledger API, e.g. `http://localhost:3000/api`.
    pub base_url: String,
    /// Path segment of the initial balance endpoints under `base_url`.
    pub balance_path: String,
    pub balance_fields: BalanceFields,
    pub timeout_secs: u64,
    /// Extra attempts for failed reads. Writes are never retried.
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub retry_jitter_ms: u64,
    pub cache_dir: Option<PathBuf>,
    pub cache_ttl_hours: i64,
    pub health_interval_secs: u64,
    /// How long the customer list is reused before asking the API again.
    pub directory_ttl_secs: u64,
    pub customer_limit: u32
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            balance_path: "saldos".to_string(),
            balance_fields: BalanceFields::default(),
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 2000,
            retry_max_delay_ms: 30_000,
            retry_jitter_ms: 1000,
            cache_dir: None,
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            health_interval_secs: 30,
            directory_ttl_secs: 300,
            customer_limit: 1000
        }
    }
}

impl Config {
    /// Loads `path` if given, else the default location when it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source
        })?;

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Rejects values the cache and the connection monitor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.health_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "health_interval_secs",
                reason: "must be at least 1".to_string()
            })
        }

        match TimeDelta::try_hours(self.cache_ttl_hours) {
            Some(ttl) if ttl > TimeDelta::zero() => Ok(()),
            _ => Err(ConfigError::Invalid {
                field: "cache_ttl_hours",
                reason: format!("{} is not a positive number of hours", self.cache_ttl_hours)
            })
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|directory| directory.join(APP_DIRECTORY).join(CONFIG_FILE))
    }

    /// Configured cache directory, else the platform cache directory.
    pub fn cache_directory(&self) -> Option<PathBuf> {
        self.cache_dir.clone()
            .or_else(|| dirs::cache_dir().map(|directory| directory.join(APP_DIRECTORY)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Falls back to 24 hours when the configured value is out of range.
    pub fn cache_ttl(&self) -> TimeDelta {
        TimeDelta::try_hours(self.cache_ttl_hours)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .unwrap_or_else(|| TimeDelta::hours(DEFAULT_CACHE_TTL_HOURS))
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }

    pub fn directory_ttl(&self) -> Duration {
        Duration::from_secs(self.directory_ttl_secs)
    }
}
