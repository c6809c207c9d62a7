//! In-memory model of every dashboard display

use super::{gauge::Speedometer, Presenter};
use crate::{
    chart::ChartBuffer,
    mapper::{MetricDisplay, PresentationUpdate, ServerDisplay},
    quality::QualityLabel,
};
use std::time::Instant;

/// Text shown in place of a value that has not been measured yet
pub const PLACEHOLDER: &str = "--";

const START_CAPTION: &str = "Start Speed Test";
const TESTING_CAPTION: &str = "Testing...";

/// Emphasis of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Normal,
    Success,
    Error,
}

/// One metric card: value, quality label and quality bar
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub value: String,
    pub quality: String,
    pub quality_label: Option<QualityLabel>,
    pub bar_percent: u8,
}

impl Default for MetricCard {
    fn default() -> Self {
        Self {
            value: PLACEHOLDER.to_string(),
            quality: PLACEHOLDER.to_string(),
            quality_label: None,
            bar_percent: 0,
        }
    }
}

impl MetricCard {
    fn show(&mut self, metric: &MetricDisplay) {
        self.value = metric.value.clone();
        self.quality = metric.quality.label.description().to_string();
        self.quality_label = Some(metric.quality.label);
        self.bar_percent = metric.quality.percent;
    }
}

/// Every display the controller can change
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub speedometer: Speedometer,
    pub speed_label: String,
    pub status_text: String,
    pub status_style: StatusStyle,
    pub progress: u8,
    /// `None` while the server is still unknown
    pub server: Option<ServerDisplay>,
    pub server_text: String,
    pub ping: MetricCard,
    pub download: MetricCard,
    pub upload: MetricCard,
    pub start_enabled: bool,
    pub start_caption: String,
    pub chart: ChartBuffer,
    /// Number of snapshots applied since the last reset
    pub updates_applied: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            speedometer: Speedometer::new(),
            speed_label: "Ready".to_string(),
            status_text: "Ready to test".to_string(),
            status_style: StatusStyle::Normal,
            progress: 0,
            server: None,
            server_text: String::new(),
            ping: MetricCard::default(),
            download: MetricCard::default(),
            upload: MetricCard::default(),
            start_enabled: true,
            start_caption: START_CAPTION.to_string(),
            chart: ChartBuffer::new(),
            updates_applied: 0,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gauge readout rounded the way the speed display shows it
    pub fn speed_display(&self, now: Instant) -> u64 {
        self.speedometer.value_at(now).max(0.0).round() as u64
    }

    /// Server panel line, or the connecting placeholder
    pub fn server_panel(&self) -> String {
        match &self.server {
            Some(server) => format!("{} ({})", server.sponsor, server.location),
            None => "Connecting...".to_string(),
        }
    }
}

impl Presenter for DashboardState {
    fn reset(&mut self) {
        self.speedometer.snap_to(0.0);
        self.speed_label = "Testing...".to_string();
        self.status_text = "Initializing...".to_string();
        self.status_style = StatusStyle::Normal;
        self.progress = 0;
        self.ping = MetricCard::default();
        self.download = MetricCard::default();
        self.upload = MetricCard::default();
        self.server = None;
        self.server_text.clear();
        self.chart.reset();
        self.updates_applied = 0;
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        self.start_enabled = enabled;
        self.start_caption = if enabled { START_CAPTION } else { TESTING_CAPTION }.to_string();
    }

    fn apply(&mut self, update: &PresentationUpdate) {
        self.status_text = update.status_text.clone();
        self.speed_label = update.speed_label.clone();
        self.progress = update.progress;

        if let Some(server) = &update.server {
            self.server_text = server.name.clone();
            self.server = Some(server.clone());
        }
        if let Some(ping) = &update.ping {
            self.ping.show(ping);
        }
        if let Some(download) = &update.download {
            self.download.show(download);
        }
        if let Some(upload) = &update.upload {
            self.upload.show(upload);
        }

        self.updates_applied += 1;
    }

    fn update_speedometer(&mut self, speed: f64) {
        self.speedometer.set_target(speed, Instant::now());
    }

    fn render_chart(&mut self, chart: &ChartBuffer) {
        self.chart = chart.clone();
    }

    fn show_error(&mut self, message: &str) {
        self.status_text = format!("Error: {}", message);
        self.status_style = StatusStyle::Error;
        self.speed_label = "Test failed".to_string();
        self.progress = 0;
    }

    fn show_success(&mut self) {
        self.status_style = StatusStyle::Success;
        self.status_text = "Test completed successfully!".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::map_snapshot;
    use crate::models::{ServerInfo, StatusSnapshot, TestStatus};

    #[test]
    fn test_reset_restores_placeholders() {
        let mut state = DashboardState::new();
        state.apply(&map_snapshot(
            &StatusSnapshot::new(TestStatus::TestingPing).with_ping(33.0),
        ));
        state.show_error("boom");
        state.reset();

        assert_eq!(state.ping, MetricCard::default());
        assert_eq!(state.status_text, "Initializing...");
        assert_eq!(state.speed_label, "Testing...");
        assert_eq!(state.status_style, StatusStyle::Normal);
        assert_eq!(state.progress, 0);
        assert_eq!(state.server_panel(), "Connecting...");
        assert!(state.chart.is_empty());
        assert_eq!(state.speed_display(Instant::now()), 0);
    }

    #[test]
    fn test_apply_leaves_missing_metrics_untouched() {
        let mut state = DashboardState::new();
        state.apply(&map_snapshot(&StatusSnapshot::new(TestStatus::TestingPing).with_ping(12.0)));
        state.apply(&map_snapshot(&StatusSnapshot::new(TestStatus::TestingDownload).with_download(42.0)));

        assert_eq!(state.ping.value, "12");
        assert_eq!(state.ping.quality, "Excellent");
        assert_eq!(state.download.value, "42");
        assert_eq!(state.download.quality, "Fair");
        assert_eq!(state.download.bar_percent, 50);
        assert_eq!(state.upload.value, PLACEHOLDER);
        assert_eq!(state.progress, 50);
        assert_eq!(state.updates_applied, 2);
    }

    #[test]
    fn test_server_panel() {
        let mut state = DashboardState::new();
        let server = ServerInfo {
            sponsor: "Acme ISP".into(),
            name: "Berlin".into(),
            country: "Germany".into(),
        };
        state.apply(&map_snapshot(&StatusSnapshot::new(TestStatus::FindingServer).with_server(server)));
        assert_eq!(state.server_panel(), "Acme ISP (Berlin, Germany)");
        assert_eq!(state.server_text, "Berlin");
    }

    #[test]
    fn test_start_affordance_caption() {
        let mut state = DashboardState::new();
        state.set_start_enabled(false);
        assert!(!state.start_enabled);
        assert_eq!(state.start_caption, "Testing...");
        state.set_start_enabled(true);
        assert_eq!(state.start_caption, "Start Speed Test");
    }

    #[test]
    fn test_error_and_success_messages() {
        let mut state = DashboardState::new();
        state.progress = 80;
        state.show_error("Connection error: Server error");
        assert_eq!(state.status_text, "Error: Connection error: Server error");
        assert_eq!(state.status_style, StatusStyle::Error);
        assert_eq!(state.speed_label, "Test failed");
        assert_eq!(state.progress, 0);

        state.show_success();
        assert_eq!(state.status_text, "Test completed successfully!");
        assert_eq!(state.status_style, StatusStyle::Success);
    }
}
