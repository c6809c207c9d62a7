//! Speed Test Monitor
//!
//! A client for a network speed test service. It starts a test run, polls the
//! service for live progress and renders latency, throughput, quality ratings,
//! a speedometer gauge and a rolling throughput chart.

pub mod app;
pub mod chart;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod models;
pub mod output;
pub mod quality;
pub mod session;

// Re-export commonly used types
pub use chart::ChartBuffer;
pub use client::{HttpMeasurementClient, MeasurementService};
pub use error::{AppError, Result};
pub use mapper::{map_snapshot, PresentationUpdate};
pub use models::{Config, FinalResults, ServerInfo, StatusSnapshot, TestStatus};
pub use output::{DashboardState, Presenter, TerminalPresenter};
pub use quality::{latency_quality, throughput_quality, QualityLabel, QualityRating};
pub use session::{ControllerPhase, SessionController, SessionId, SessionOutcome, SessionSettings, StartOutcome};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const CHART_CAPACITY: usize = 20;

    pub const START_TEST_PATH: &str = "/api/start-test";
    pub const STATUS_PATH: &str = "/api/status";
}
