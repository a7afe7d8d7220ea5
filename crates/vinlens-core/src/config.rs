//! Configuration management for VinLens.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/vinlens/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Request and pacing settings
    pub lookup: LookupConfig,
    /// Provider catalog settings
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Reads `path` when given (a missing file is then an error), otherwise the
    /// platform config file or defaults. Supports the following environment
    /// variables:
    /// - `VINLENS_TIMEOUT_SECS`: Override the per-request timeout
    /// - `VINLENS_MIN_DELAY_MS`: Override the lower pacing bound
    /// - `VINLENS_MAX_DELAY_MS`: Override the upper pacing bound
    /// - `VINLENS_DEFINITIONS_DIR`: Load provider definitions from this directory
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides, then validate the result.
    pub fn with_overrides(mut self, get: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        self.apply_overrides(get);
        self.validate()?;
        Ok(self)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(secs) = get("VINLENS_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.lookup.timeout_secs = secs;
            tracing::debug!("Override lookup.timeout_secs from env: {}", secs);
        }

        if let Some(ms) = get("VINLENS_MIN_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.lookup.min_delay_ms = ms;
            tracing::debug!("Override lookup.min_delay_ms from env: {}", ms);
        }

        if let Some(ms) = get("VINLENS_MAX_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.lookup.max_delay_ms = ms;
            tracing::debug!("Override lookup.max_delay_ms from env: {}", ms);
        }

        if let Some(dir) = get("VINLENS_DEFINITIONS_DIR").filter(|v| !v.is_empty()) {
            tracing::debug!("Override providers.definitions_dir from env: {}", dir);
            self.providers.definitions_dir = Some(PathBuf::from(dir));
        }
    }

    /// Check that configured values are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.lookup.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookup.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.lookup.min_delay_ms > self.lookup.max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "lookup.min_delay_ms".to_string(),
                reason: format!(
                    "must not exceed max_delay_ms ({} > {})",
                    self.lookup.min_delay_ms, self.lookup.max_delay_ms
                ),
            });
        }

        if self.lookup.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "lookup.user_agents".to_string(),
                reason: "at least one user agent is required".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/vinlens/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "vinlens", "vinlens").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Request and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Lower bound of the delay between providers, in milliseconds
    pub min_delay_ms: u64,
    /// Upper (exclusive) bound of the delay between providers, in milliseconds
    pub max_delay_ms: u64,
    /// Pool of client signatures; one is picked per outbound request
    pub user_agents: Vec<String>,
}

impl LookupConfig {
    /// Per-request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Lower pacing bound as a `Duration`.
    #[must_use]
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    /// Upper pacing bound as a `Duration`.
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            user_agents: default_user_agents(),
        }
    }
}

/// Common desktop browser signatures.
fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Provider catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Directory of TOML provider definitions (built-in catalog when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions_dir: Option<PathBuf>,
    /// Provider names to query; empty means every registered provider
    pub enabled: Vec<String>,
}
