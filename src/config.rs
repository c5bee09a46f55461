//! Configuration loading from TOML files.

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};
use crate::routing::DEFAULT_SHARD_COUNT;

/// Seconds a fragment survives in the disposable query cache.
pub const DEFAULT_FRAGMENT_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Cluster shape and cache policy.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Fixed number of inventory/member shards. Changing this on an existing
    /// deployment requires a full data migration; there is no live
    /// rebalancing.
    #[serde(default = "default_shard_count")]
    pub shard_count: u16,
    /// Expiry for entries in the fragment query cache.
    #[serde(default = "default_fragment_ttl_secs")]
    pub fragment_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_shard_count() -> u16 {
    DEFAULT_SHARD_COUNT
}

fn default_fragment_ttl_secs() -> u64 {
    DEFAULT_FRAGMENT_TTL_SECS
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.store.shard_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.shard_count",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.store.fragment_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.fragment_ttl_secs",
                reason: "must be at least 1 second".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber. `RUST_LOG` wins over the configured
    /// level when set.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            fragment_ttl_secs: DEFAULT_FRAGMENT_TTL_SECS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.shard_count, DEFAULT_SHARD_COUNT);
        assert_eq!(config.store.fragment_ttl_secs, DEFAULT_FRAGMENT_TTL_SECS);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_store_section_parses() {
        let config: Config = toml::from_str("[store]\nshard_count = 5\n").unwrap();
        assert_eq!(config.store.shard_count, 5);
        assert_eq!(config.store.fragment_ttl_secs, DEFAULT_FRAGMENT_TTL_SECS);
    }

    #[test]
    fn zero_shard_count_is_rejected() {
        let config: Config = toml::from_str("[store]\nshard_count = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let config: Config = toml::from_str("[store]\nfragment_ttl_secs = 0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
