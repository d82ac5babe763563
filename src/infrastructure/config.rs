//! Configuration management.
//!
//! Hierarchical configuration using figment: programmatic defaults, then
//! project YAML, then environment variables with the `ATOM_` prefix.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid max_gap_hours: {0}. Must be positive")]
    InvalidMaxGap(i64),

    #[error("Invalid context_window: {0}. Must be at least 1")]
    InvalidContextWindow(usize),

    #[error("Invalid base_quality_threshold: {0}. Must be in (0, 1]")]
    InvalidQualityThreshold(f64),

    #[error("Invalid max_directives: {0}. Must be at least 1")]
    InvalidMaxDirectives(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: ".atom/memory.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationSettings {
    /// Time-gap boundary threshold in hours
    pub max_gap_hours: i64,
    /// Look-back events carried across an episode boundary
    pub context_window: usize,
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            max_gap_hours: 4,
            context_window: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionSettings {
    /// Base quality-gate threshold before domain weighting
    pub base_quality_threshold: f64,
    /// Default cap on directives per reflection cycle
    pub max_directives: usize,
    /// Cap on traces fetched per gather query
    pub max_traces_per_query: usize,
    /// Timeout for the single LLM call, in seconds
    pub llm_timeout_secs: u64,
}

impl Default for ReflectionSettings {
    fn default() -> Self {
        Self {
            base_quality_threshold: 0.3,
            max_directives: 5,
            max_traces_per_query: 50,
            llm_timeout_secs: 60,
        }
    }
}

/// Top-level configuration for the memory core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub segmentation: SegmentationSettings,
    #[serde(default)]
    pub reflection: ReflectionSettings,
    #[serde(default)]
    pub logging: crate::infrastructure::logging::LoggingConfig,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .atom/config.yaml (project config)
    /// 3. .atom/local.yaml (local overrides, optional)
    /// 4. Environment variables (ATOM_* prefix)
    pub fn load() -> Result<MemoryConfig> {
        let config: MemoryConfig = Figment::new()
            .merge(Serialized::defaults(MemoryConfig::default()))
            .merge(Yaml::file(".atom/config.yaml"))
            .merge(Yaml::file(".atom/local.yaml"))
            .merge(Env::prefixed("ATOM_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<MemoryConfig> {
        let config: MemoryConfig = Figment::new()
            .merge(Serialized::defaults(MemoryConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &MemoryConfig) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }
        if config.segmentation.max_gap_hours <= 0 {
            return Err(ConfigError::InvalidMaxGap(config.segmentation.max_gap_hours));
        }
        if config.segmentation.context_window == 0 {
            return Err(ConfigError::InvalidContextWindow(
                config.segmentation.context_window,
            ));
        }
        let threshold = config.reflection.base_quality_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidQualityThreshold(threshold));
        }
        if config.reflection.max_directives == 0 {
            return Err(ConfigError::InvalidMaxDirectives(
                config.reflection.max_directives,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = MemoryConfig::default();
        assert!(ConfigLoader::validate(&config).is_ok());
        assert_eq!(config.segmentation.max_gap_hours, 4);
        assert_eq!(config.reflection.base_quality_threshold, 0.3);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = MemoryConfig::default();
        config.reflection.base_quality_threshold = 0.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidQualityThreshold(_))
        ));
        config.reflection.base_quality_threshold = 1.5;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_zero_context_window_rejected() {
        let mut config = MemoryConfig::default();
        config.segmentation.context_window = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidContextWindow(0))
        ));
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = MemoryConfig::default();
        config.database.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "segmentation:\n  max_gap_hours: 6\nreflection:\n  max_directives: 3"
        )
        .unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.segmentation.max_gap_hours, 6);
        assert_eq!(config.reflection.max_directives, 3);
        // Untouched sections keep their defaults.
        assert_eq!(config.segmentation.context_window, 5);
        assert_eq!(config.database.path, ".atom/memory.db");
    }

    #[test]
    fn test_hierarchical_merging_precedence() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "segmentation:\n  max_gap_hours: 6\n  context_window: 8\nlogging:\n  level: debug"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut local_file = NamedTempFile::new().unwrap();
        writeln!(local_file, "segmentation:\n  max_gap_hours: 12").unwrap();
        local_file.flush().unwrap();

        let config: MemoryConfig = Figment::new()
            .merge(Serialized::defaults(MemoryConfig::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(local_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.segmentation.max_gap_hours, 12, "local override wins");
        assert_eq!(
            config.segmentation.context_window, 8,
            "base value persists when not overridden"
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_vars_win_over_yaml() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "reflection:\n  max_directives: 3").unwrap();
        file.flush().unwrap();

        std::env::set_var("ATOM_REFLECTION__MAX_DIRECTIVES", "7");

        let config: MemoryConfig = Figment::new()
            .merge(Serialized::defaults(MemoryConfig::default()))
            .merge(Yaml::file(file.path()))
            .merge(Env::prefixed("ATOM_").split("__"))
            .extract()
            .unwrap();

        std::env::remove_var("ATOM_REFLECTION__MAX_DIRECTIVES");

        assert_eq!(config.reflection.max_directives, 7, "env override wins");
    }
}
