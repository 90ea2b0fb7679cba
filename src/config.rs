use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::sla::SlaThresholds;

/// Main configuration structure for the SLA pipeline
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlaPipelineConfig {
    /// Holiday API settings
    pub holiday_api: HolidayApiConfig,
    /// SLA threshold table
    pub sla: SlaThresholds,
    /// Pipeline layer paths and filters
    pub pipeline: PipelineConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HolidayApiConfig {
    /// Base URL of the year-keyed holiday endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl HolidayApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Raw export file consumed by the bronze stage
    pub bronze_path: String,
    /// Cleaned dataset written by the silver stage
    pub silver_path: String,
    /// Directory receiving the gold dataset and reports
    pub gold_dir: String,
    /// Statuses considered terminal; only these reach the evaluator
    pub terminal_statuses: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for SlaPipelineConfig {
    fn default() -> Self {
        Self {
            holiday_api: HolidayApiConfig {
                base_url: "https://brasilapi.com.br/api/feriados/v1".to_string(),
                timeout_seconds: 10,
            },
            sla: SlaThresholds::default(),
            pipeline: PipelineConfig {
                bronze_path: "data/bronze/bronze_issues.json".to_string(),
                silver_path: "data/silver/silver_issues.json".to_string(),
                gold_dir: "data/gold".to_string(),
                terminal_statuses: vec!["Done".to_string(), "Resolved".to_string()],
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

impl SlaPipelineConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (sla-pipeline.toml)
    /// 3. Environment variables (prefixed with SLA_PIPELINE_)
    pub fn load() -> Result<Self> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&SlaPipelineConfig::default())?);

        if Path::new("sla-pipeline.toml").exists() {
            builder = builder.add_source(File::with_name("sla-pipeline"));
        }

        builder = builder.add_source(
            Environment::with_prefix("SLA_PIPELINE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<SlaPipelineConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = SlaPipelineConfig::load_env_file();
        SlaPipelineConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static SlaPipelineConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_complete() {
        let config = SlaPipelineConfig::default();
        assert_eq!(config.sla.high_hours, 24);
        assert_eq!(config.sla.default_hours, 120);
        assert_eq!(
            config.pipeline.terminal_statuses,
            vec!["Done".to_string(), "Resolved".to_string()]
        );
        assert_eq!(config.holiday_api.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_config_round_trips_through_builder() {
        let config = SlaPipelineConfig::load().expect("defaults deserialize");
        assert_eq!(config.sla.medium_hours, 72);
        assert!(!config.holiday_api.base_url.is_empty());
    }
}
