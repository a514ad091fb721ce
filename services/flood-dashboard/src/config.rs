//! Configuration types for the flood dashboard service

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{ChartType, SourceKind};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Flood API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Number of readings requested until the range selector changes it
    #[serde(default = "default_range")]
    pub default_range: u32,
    /// Per-request timeout; the HTTP client's defaults apply when unset
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_range: default_range(),
            request_timeout: None,
        }
    }
}

/// Refresh timer and initial view modes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_refresh_interval", with = "humantime_serde")]
    pub refresh_interval: Duration,
    #[serde(default)]
    pub initial_source: SourceKind,
    #[serde(default)]
    pub initial_chart: ChartType,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            initial_source: SourceKind::default(),
            initial_chart: ChartType::default(),
        }
    }
}

/// Which optional display slots exist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub water_slots: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { water_slots: true }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

impl Config {
    /// Reject values the scheduler cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(crate::DashboardError::Config(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if self.api.default_range == 0 {
            return Err(crate::DashboardError::Config(
                "api.default_range must be at least 1".to_string(),
            ));
        }
        if self.scheduler.refresh_interval.is_zero() {
            return Err(crate::DashboardError::Config(
                "scheduler.refresh_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_range() -> u32 {
    10
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(300)
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11116
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
