//! Configuration validation utilities and rules

use crate::{error::Result, models::Config};
use colored::*;

/// Configuration validator with advisory checks on top of [`Config::validate`]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and collect advisory warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Self::validate_service_url(&config.service_url)?;
        warnings.extend(Self::validate_timing(config));

        Ok(warnings)
    }

    fn validate_service_url(service_url: &str) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let parsed = url::Url::parse(service_url)?;

        let local = match parsed.host() {
            Some(url::Host::Domain(host)) => host == "localhost",
            Some(url::Host::Ipv4(ip)) => ip.is_loopback() || ip.is_private(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            None => false,
        };

        if parsed.scheme() == "http" && !local {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Service URL '{}' uses plain HTTP over a non-local network", service_url),
            ));
        }

        if !parsed.path().is_empty() && parsed.path() != "/" {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Service URL includes path '{}'; API requests are sent below it", parsed.path()),
            ));
        }

        if parsed.query().is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Query string in service URL '{}' is not sent with API requests", service_url),
            ));
        }

        Ok(warnings)
    }

    fn validate_timing(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.poll_interval_ms < 100 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Poll interval of {}ms puts heavy load on the service", config.poll_interval_ms),
            ));
        } else if config.poll_interval_ms > 5_000 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Poll interval of {}ms will make progress updates coarse", config.poll_interval_ms),
            ));
        }

        if config.timeout_seconds < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Timeout of {}s may cut off status requests while a test is running", config.timeout_seconds),
            ));
        }

        if config.settle_delay_ms == 0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Settle delay is 0; the final status is replaced by the result message immediately".to_string(),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
