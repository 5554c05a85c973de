// Tripmatch Configuration
//
// Relaxation ladders, scoring constants, store retry policy and server
// address. Every section falls back to its defaults when absent.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "TRIPMATCH_DB_PATH";

/// Database path selecting the in-memory store
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripmatchConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Relaxation planner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Result count a stage must reach to be accepted
    pub min_results: usize,

    /// Fractional budget tolerances tried in order (0.10 = 10% over budget)
    pub budget_ladder: Vec<f64>,

    /// Day tolerances tried in order
    pub day_ladder: Vec<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_results: 1,
            budget_ladder: vec![0.10, 0.20, 0.30],
            day_ladder: vec![1, 2, 3],
        }
    }
}

/// Like-probability and confidence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Additive smoothing constant; gives a 0.5 prior with no feedback
    pub smoothing_alpha: f64,

    /// Feedback volume below which confidence is low
    pub low_threshold: u64,

    /// Feedback volume at or above which confidence is high
    pub high_threshold: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 1.0,
            low_threshold: 5,
            high_threshold: 20,
        }
    }
}

/// Store access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Attempts for idempotent reads (writes are never retried)
    pub read_retry_attempts: u32,

    /// Delay between read attempts, multiplied by the attempt number
    #[serde(rename = "read_retry_backoff_ms", with = "serde_millis")]
    pub read_retry_backoff: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            read_retry_attempts: 3,
            read_retry_backoff: Duration::from_millis(25),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 5000).into(),
        }
    }
}

// Custom serde module for Duration (serialize/deserialize as milliseconds)
mod serde_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl TripmatchConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: TripmatchConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.scoring.validate()?;

        if self.storage.read_retry_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "storage: read_retry_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_results == 0 {
            return Err(ConfigError::ValidationError(
                "engine: min_results must be at least 1".to_string(),
            ));
        }

        if self
            .budget_ladder
            .iter()
            .any(|step| !step.is_finite() || *step <= 0.0)
        {
            return Err(ConfigError::ValidationError(
                "engine: budget_ladder steps must be positive".to_string(),
            ));
        }
        if self.budget_ladder.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::ValidationError(
                "engine: budget_ladder must be strictly increasing".to_string(),
            ));
        }

        if self.day_ladder.iter().any(|step| *step == 0) {
            return Err(ConfigError::ValidationError(
                "engine: day_ladder steps must be positive".to_string(),
            ));
        }
        if self.day_ladder.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::ValidationError(
                "engine: day_ladder must be strictly increasing".to_string(),
            ));
        }

        Ok(())
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.smoothing_alpha.is_finite() || self.smoothing_alpha <= 0.0 {
            return Err(ConfigError::ValidationError(
                "scoring: smoothing_alpha must be positive".to_string(),
            ));
        }
        if self.low_threshold > self.high_threshold {
            return Err(ConfigError::ValidationError(
                "scoring: low_threshold must not exceed high_threshold".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the default database path using XDG_DATA_HOME standard
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripmatch")
        .join("tripmatch.db")
}

/// Resolve the database path from CLI arg, env var, or default
pub fn resolve_db_path(cli_path: Option<String>) -> String {
    cli_path
        .or_else(|| std::env::var(DB_PATH_ENV).ok().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| default_db_path().to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TripmatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.min_results, 1);
        assert_eq!(config.engine.budget_ladder, vec![0.10, 0.20, 0.30]);
        assert_eq!(config.engine.day_ladder, vec![1, 2, 3]);
        assert_eq!(config.scoring.smoothing_alpha, 1.0);
    }

    #[test]
    fn test_from_toml_partial() {
        let toml_str = r#"
            [engine]
            min_results = 3
            day_ladder = [2, 4]

            [scoring]
            high_threshold = 50

            [storage]
            read_retry_backoff_ms = 10
        "#;

        let config = TripmatchConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.engine.min_results, 3);
        assert_eq!(config.engine.day_ladder, vec![2, 4]);
        // Unspecified keys keep defaults
        assert_eq!(config.engine.budget_ladder, vec![0.10, 0.20, 0.30]);
        assert_eq!(config.scoring.low_threshold, 5);
        assert_eq!(config.scoring.high_threshold, 50);
        assert_eq!(config.storage.read_retry_backoff, Duration::from_millis(10));
        assert_eq!(config.server.addr.port(), 5000);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TripmatchConfig::from_toml("").unwrap();
        assert_eq!(config.storage.read_retry_attempts, 3);
    }

    #[test]
    fn test_validation_rejects_zero_min_results() {
        let mut config = TripmatchConfig::default();
        config.engine.min_results = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("min_results"));
    }

    #[test]
    fn test_validation_rejects_unordered_ladders() {
        let mut config = TripmatchConfig::default();
        config.engine.budget_ladder = vec![0.2, 0.1];
        assert!(config.validate().is_err());

        let mut config = TripmatchConfig::default();
        config.engine.day_ladder = vec![0, 1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_scoring() {
        let mut config = TripmatchConfig::default();
        config.scoring.smoothing_alpha = 0.0;
        assert!(config.validate().is_err());

        let mut config = TripmatchConfig::default();
        config.scoring.low_threshold = 30;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("low_threshold"));
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = TripmatchConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized = TripmatchConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.engine.day_ladder, deserialized.engine.day_ladder);
        assert_eq!(config.server.addr, deserialized.server.addr);
    }

    #[test]
    fn test_resolve_db_path_prefers_cli() {
        let path = resolve_db_path(Some("/tmp/trips.db".to_string()));
        assert_eq!(path, "/tmp/trips.db");
    }
}
