//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    ///
    /// Variables already set in the process environment win over the file.
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {} file: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Speed Test Monitor Configuration
#
# Values here are used as defaults and can be overridden by real environment
# variables and by command-line arguments.

# Base URL of the speed test service
# SPEEDTEST_URL=http://localhost:5000

# Delay between status polls in milliseconds (50-60000)
# POLL_INTERVAL_MS=300

# Pause after the final status before the result message, in milliseconds (0-10000)
# SETTLE_DELAY_MS=500

# Request timeout in seconds (1-300)
# TIMEOUT_SECONDS=10

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#.to_string()
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "SPEEDTEST_URL" => {
                let parsed = url::Url::parse(value)
                    .map_err(|e| AppError::config(format!("Invalid SPEEDTEST_URL value '{}': {}", value, e)))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::config(format!("SPEEDTEST_URL must use http or https: {}", value)));
                }
            }
            "POLL_INTERVAL_MS" => {
                let interval: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid POLL_INTERVAL_MS value '{}': {}", value, e)))?;
                if !(50..=60_000).contains(&interval) {
                    return Err(AppError::config(format!("POLL_INTERVAL_MS must be between 50 and 60000, got: {}", interval)));
                }
            }
            "SETTLE_DELAY_MS" => {
                let delay: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid SETTLE_DELAY_MS value '{}': {}", value, e)))?;
                if delay > 10_000 {
                    return Err(AppError::config(format!("SETTLE_DELAY_MS cannot exceed 10000, got: {}", delay)));
                }
            }
            "TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!("TIMEOUT_SECONDS must be between 1 and 300, got: {}", timeout)));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("SPEEDTEST_URL", "Base URL of the speed test service", "http://localhost:5000"),
            ("POLL_INTERVAL_MS", "Delay between status polls in ms (50-60000)", "300"),
            ("SETTLE_DELAY_MS", "Pause before the final result message in ms (0-10000)", "500"),
            ("TIMEOUT_SECONDS", "Request timeout in seconds (1-300)", "10"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }
}
