//! Data models and structures for the speed test monitor

pub mod config;
pub mod snapshot;

// Re-export main model types
pub use config::Config;
pub use snapshot::{FinalResults, ServerInfo, StatusSnapshot, TestStatus};
