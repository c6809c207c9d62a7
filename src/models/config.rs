//! Configuration data model and validation

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the measurement service
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Interval between status polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Delay between a terminal status and the final presentation update
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Print the final results as JSON instead of the dashboard summary
    #[serde(default)]
    pub json_output: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            timeout_seconds: default_timeout_secs(),
            enable_color: default_enable_color(),
            json_output: false,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.service_url.is_empty() {
            return Err(AppError::config("Service URL cannot be empty"));
        }

        match url::Url::parse(&self.service_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "Service URL must use http or https: {}",
                        self.service_url
                    )));
                }
                if parsed.host_str().is_none() {
                    return Err(AppError::config(format!("Service URL has no host: {}", self.service_url)));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!("Invalid service URL '{}': {}", self.service_url, e)));
            }
        }

        if self.poll_interval_ms < 50 {
            return Err(AppError::config("Poll interval must be at least 50ms"));
        }

        if self.poll_interval_ms > 60_000 {
            return Err(AppError::config("Poll interval cannot exceed 60000ms"));
        }

        if self.settle_delay_ms > 10_000 {
            return Err(AppError::config("Settle delay cannot exceed 10000ms"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(service_url) = std::env::var("SPEEDTEST_URL") {
            let service_url = service_url.trim();
            if !service_url.is_empty() {
                self.service_url = service_url.to_string();
            }
        }

        if let Ok(interval) = std::env::var("POLL_INTERVAL_MS") {
            self.poll_interval_ms = interval.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid POLL_INTERVAL_MS value '{}': {}", interval, e)))?;
        }

        if let Ok(delay) = std::env::var("SETTLE_DELAY_MS") {
            self.settle_delay_ms = delay.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid SETTLE_DELAY_MS value '{}': {}", delay, e)))?;
        }

        if let Ok(timeout) = std::env::var("TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_service_url() -> String {
    crate::defaults::DEFAULT_SERVICE_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    crate::defaults::DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_settle_delay_ms() -> u64 {
    crate::defaults::DEFAULT_SETTLE_DELAY.as_millis() as u64
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
