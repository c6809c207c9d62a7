//! Status-to-presentation mapping
//!
//! Turns one [`StatusSnapshot`] into the set of display changes it implies.
//! Everything here is pure; the session controller applies the result.

use crate::models::{ServerInfo, StatusSnapshot, TestStatus};
use crate::quality::{latency_quality, throughput_quality, QualityRating};
use serde::Serialize;

/// Human label and progress percentage for a status
pub fn status_progress(status: &TestStatus) -> (String, u8) {
    let (text, progress) = match status {
        TestStatus::Starting => ("Initializing test...", 5),
        TestStatus::FindingServer => ("Finding optimal server...", 15),
        TestStatus::TestingPing => ("Testing latency...", 30),
        TestStatus::TestingDownload => ("Testing download speed...", 50),
        TestStatus::TestingUpload => ("Testing upload speed...", 80),
        TestStatus::Completed => ("Test completed!", 100),
        TestStatus::Error => ("Error occurred", 0),
        TestStatus::Other(raw) => return (raw.clone(), 0),
    };
    (text.to_string(), progress)
}

/// Render a metric the way the service reported it (`42`, `12.34`)
pub fn format_metric(value: f64) -> String {
    value.to_string()
}

/// Value and rating shown on a metric card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDisplay {
    pub raw: f64,
    pub value: String,
    pub quality: QualityRating,
}

impl MetricDisplay {
    fn latency(raw: f64) -> Self {
        Self { raw, value: format_metric(raw), quality: latency_quality(raw) }
    }

    fn throughput(raw: f64) -> Self {
        Self { raw, value: format_metric(raw), quality: throughput_quality(raw) }
    }
}

/// Server panel contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerDisplay {
    pub sponsor: String,
    /// `"<name>, <country>"`
    pub location: String,
    /// Short name for the header line
    pub name: String,
}

impl From<&ServerInfo> for ServerDisplay {
    fn from(server: &ServerInfo) -> Self {
        Self {
            sponsor: server.sponsor.clone(),
            location: format!("{}, {}", server.name, server.country),
            name: server.name.clone(),
        }
    }
}

/// One point for the rolling chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartSample {
    pub download: f64,
    pub upload: f64,
}

/// Display changes implied by one snapshot
///
/// `None` fields leave the corresponding display untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationUpdate {
    pub status_text: String,
    pub speed_label: String,
    pub progress: u8,
    pub server: Option<ServerDisplay>,
    pub ping: Option<MetricDisplay>,
    pub download: Option<MetricDisplay>,
    pub upload: Option<MetricDisplay>,
    pub speedometer: Option<f64>,
    pub chart_sample: Option<ChartSample>,
}

/// Map a snapshot to the display changes it implies
pub fn map_snapshot(snapshot: &StatusSnapshot) -> PresentationUpdate {
    let (status_text, progress) = status_progress(&snapshot.status);

    let mut update = PresentationUpdate {
        speed_label: status_text.clone(),
        status_text,
        progress,
        server: snapshot.server.as_ref().map(ServerDisplay::from),
        ping: snapshot.ping.map(MetricDisplay::latency),
        download: None,
        upload: None,
        speedometer: None,
        chart_sample: None,
    };

    if let Some(download) = snapshot.download {
        update.download = Some(MetricDisplay::throughput(download));
        if snapshot.status == TestStatus::TestingDownload {
            update.speedometer = Some(download);
            update.chart_sample = Some(ChartSample { download, upload: 0.0 });
        }
    }

    if let Some(upload) = snapshot.upload {
        update.upload = Some(MetricDisplay::throughput(upload));
        if matches!(snapshot.status, TestStatus::TestingUpload | TestStatus::Completed) {
            update.speedometer = Some(upload);
            update.chart_sample = Some(ChartSample {
                download: snapshot.download.unwrap_or(0.0),
                upload,
            });
        }
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityLabel;

    #[test]
    fn test_progress_table() {
        let table = [
            (TestStatus::Starting, "Initializing test...", 5),
            (TestStatus::FindingServer, "Finding optimal server...", 15),
            (TestStatus::TestingPing, "Testing latency...", 30),
            (TestStatus::TestingDownload, "Testing download speed...", 50),
            (TestStatus::TestingUpload, "Testing upload speed...", 80),
            (TestStatus::Completed, "Test completed!", 100),
            (TestStatus::Error, "Error occurred", 0),
        ];

        for (status, text, progress) in table {
            assert_eq!(status_progress(&status), (text.to_string(), progress));
        }
    }

    #[test]
    fn test_unknown_status_shows_raw_text() {
        let update = map_snapshot(&StatusSnapshot::new(TestStatus::Other("idle".into())));
        assert_eq!(update.status_text, "idle");
        assert_eq!(update.progress, 0);
    }

    #[test]
    fn test_download_phase_update() {
        let update = map_snapshot(&StatusSnapshot::new(TestStatus::TestingDownload).with_download(42.0));

        let download = update.download.unwrap();
        assert_eq!(download.value, "42");
        assert_eq!(download.quality.label, QualityLabel::Fair);
        assert_eq!(update.progress, 50);
        assert_eq!(update.speedometer, Some(42.0));
        assert_eq!(update.chart_sample, Some(ChartSample { download: 42.0, upload: 0.0 }));
        assert!(update.upload.is_none());
        assert!(update.ping.is_none());
    }

    #[test]
    fn test_upload_phase_carries_download_forward() {
        let snapshot = StatusSnapshot::new(TestStatus::TestingUpload)
            .with_ping(12.0)
            .with_download(88.5)
            .with_upload(20.25);
        let update = map_snapshot(&snapshot);

        assert_eq!(update.speedometer, Some(20.25));
        assert_eq!(update.chart_sample, Some(ChartSample { download: 88.5, upload: 20.25 }));
        assert_eq!(update.download.unwrap().quality.label, QualityLabel::Good);
        assert_eq!(update.upload.unwrap().value, "20.25");
        assert_eq!(update.ping.unwrap().quality.label, QualityLabel::Excellent);
    }

    #[test]
    fn test_upload_without_download_uses_zero() {
        let update = map_snapshot(&StatusSnapshot::new(TestStatus::Completed).with_upload(5.0));
        assert_eq!(update.chart_sample, Some(ChartSample { download: 0.0, upload: 5.0 }));
    }

    #[test]
    fn test_no_chart_sample_outside_throughput_phases() {
        let ping_phase = StatusSnapshot::new(TestStatus::TestingPing).with_ping(30.0);
        assert!(map_snapshot(&ping_phase).chart_sample.is_none());

        // A download value left over during the upload phase does not sample on its own
        let stale = StatusSnapshot::new(TestStatus::TestingUpload).with_download(70.0);
        let update = map_snapshot(&stale);
        assert!(update.chart_sample.is_none());
        assert!(update.speedometer.is_none());
        assert!(update.download.is_some());
    }

    #[test]
    fn test_server_display() {
        let server = ServerInfo {
            sponsor: "Acme ISP".into(),
            name: "Berlin".into(),
            country: "Germany".into(),
        };
        let update = map_snapshot(&StatusSnapshot::new(TestStatus::FindingServer).with_server(server));
        let display = update.server.unwrap();
        assert_eq!(display.sponsor, "Acme ISP");
        assert_eq!(display.location, "Berlin, Germany");
        assert_eq!(display.name, "Berlin");
        assert_eq!(update.speed_label, "Finding optimal server...");
    }
}
