//! Configuration management for the scoring pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub demo: DemoConfig,
    pub assessment: AssessmentConfig,
    pub logging: LoggingConfig,
}

/// Simulated-latency budgets for the pipeline suspension points
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Training latency in milliseconds
    #[serde(default = "default_train_delay_ms")]
    pub train_delay_ms: u64,
    /// Single-prediction latency in milliseconds
    #[serde(default = "default_predict_delay_ms")]
    pub predict_delay_ms: u64,
    /// Batch-prediction latency in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl PipelineConfig {
    pub fn train_delay(&self) -> Duration {
        Duration::from_millis(self.train_delay_ms)
    }

    pub fn predict_delay(&self) -> Duration {
        Duration::from_millis(self.predict_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

/// Synthetic demo data configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Number of synthetic records to generate
    #[serde(default = "default_record_count")]
    pub record_count: usize,
    /// Simulated load latency in milliseconds
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,
    /// Fixed RNG seed; omit for entropy-seeded generation
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DemoConfig {
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

/// Risk assessment configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentConfig {
    /// Predicted scores below this are flagged as at risk
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

fn default_train_delay_ms() -> u64 {
    1500
}

fn default_predict_delay_ms() -> u64 {
    300
}

fn default_batch_delay_ms() -> u64 {
    800
}

fn default_record_count() -> usize {
    30
}

fn default_load_delay_ms() -> u64 {
    800
}

fn default_risk_threshold() -> f64 {
    70.0
}

impl AppConfig {
    /// Load configuration from the default file location
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig {
                train_delay_ms: default_train_delay_ms(),
                predict_delay_ms: default_predict_delay_ms(),
                batch_delay_ms: default_batch_delay_ms(),
            },
            demo: DemoConfig {
                record_count: default_record_count(),
                load_delay_ms: default_load_delay_ms(),
                seed: None,
            },
            assessment: AssessmentConfig {
                risk_threshold: default_risk_threshold(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.train_delay_ms, 1500);
        assert_eq!(config.pipeline.predict_delay_ms, 300);
        assert_eq!(config.pipeline.batch_delay_ms, 800);
        assert_eq!(config.demo.record_count, 30);
        assert_eq!(config.assessment.risk_threshold, 70.0);
        assert!(config.demo.seed.is_none());
    }

    #[test]
    fn test_delay_accessors() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.train_delay(), Duration::from_millis(1500));
        assert_eq!(config.demo.load_delay(), Duration::from_millis(800));
    }
}
