//! Configuration management for Rerouter.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the redirect resolver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RerouterConfig {
    /// Match cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Match cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Absolute lifetime of a cached outcome, counted from when it was stored.
    /// A scope's whole snapshot is also dropped this long after its first
    /// entry went in.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    /// The configured lifetime as a chrono duration, as consumed by
    /// `MatchCache::from_config`.
    pub fn ttl(&self) -> chrono::Duration {
        let secs = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX)
    }
}

fn default_ttl_secs() -> u64 {
    15 * 60
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// Include the event target in each line
    #[serde(default)]
    pub with_target: bool,

    /// Include thread ids in each line
    #[serde(default = "default_with_thread_ids")]
    pub with_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            with_target: false,
            with_thread_ids: default_with_thread_ids(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_with_thread_ids() -> bool {
    true
}

impl RerouterConfig {
    /// Load configuration from a file path.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&contents)
                .map_err(|e| crate::error::RerouterError::Config(e.to_string()))
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| crate::error::RerouterError::Config(e.to_string()))
    }
}
