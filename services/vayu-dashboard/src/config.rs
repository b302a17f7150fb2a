//! Configuration types for the dashboard client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::DashboardError;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "default_device_id")]
    pub default_device_id: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_log_limit")]
    pub log_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            default_device_id: default_device_id(),
            refresh_interval_seconds: default_refresh_interval(),
            history_limit: default_history_limit(),
            log_limit: default_log_limit(),
        }
    }
}

/// Where the backend lives and how the client talks to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub fallback_policy: FallbackPolicy,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_seconds: default_timeout(),
            fallback_policy: FallbackPolicy::default(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Which composite-endpoint failures trigger the fallback aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Fall back on any failure, including unreachable backends
    #[default]
    AnyFailure,
    /// Fall back only when the backend answers 501 Not Implemented
    NotImplementedOnly,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_device_id() -> String {
    "ESP32_001".to_string()
}

fn default_refresh_interval() -> u64 {
    5
}

fn default_history_limit() -> usize {
    20
}

fn default_log_limit() -> usize {
    20
}

impl Config {
    /// Apply `BACKEND_URL`, `DEFAULT_DEVICE_ID` and `REFRESH_INTERVAL` from
    /// the process environment
    pub fn apply_env_overrides(&mut self) -> crate::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BACKEND_URL") {
            tracing::debug!("BACKEND_URL override: {}", url);
            self.backend.url = url;
        }
        if let Some(device) = lookup("DEFAULT_DEVICE_ID") {
            tracing::debug!("DEFAULT_DEVICE_ID override: {}", device);
            self.default_device_id = device;
        }
        if let Some(interval) = lookup("REFRESH_INTERVAL") {
            self.refresh_interval_seconds = interval.trim().parse().map_err(|e| {
                DashboardError::Config(format!("Invalid REFRESH_INTERVAL {:?}: {}", interval, e))
            })?;
        }
        Ok(())
    }

    /// Check value ranges after all overrides have been applied
    pub fn validate(&self) -> crate::Result<()> {
        let url = self.backend.url.trim();
        if url.is_empty() {
            return Err(DashboardError::Config("backend url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DashboardError::Config(format!(
                "backend url {:?} must start with http:// or https://",
                url
            )));
        }
        if self.backend.timeout_seconds == 0 {
            return Err(DashboardError::Config(
                "timeout_seconds must be at least 1".to_string(),
            ));
        }
        if !(1..=60).contains(&self.refresh_interval_seconds) {
            return Err(DashboardError::Config(format!(
                "refresh_interval_seconds must be between 1 and 60, got {}",
                self.refresh_interval_seconds
            )));
        }
        if !(10..=100).contains(&self.history_limit) {
            return Err(DashboardError::Config(format!(
                "history_limit must be between 10 and 100, got {}",
                self.history_limit
            )));
        }
        if !(10..=100).contains(&self.log_limit) {
            return Err(DashboardError::Config(format!(
                "log_limit must be between 10 and 100, got {}",
                self.log_limit
            )));
        }
        if self.default_device_id.trim().is_empty() {
            return Err(DashboardError::Config(
                "default_device_id is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
