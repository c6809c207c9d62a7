//! Wire model for the measurement service status payload

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase reported by the measurement service
///
/// Unknown values are kept verbatim so they can still be displayed; they are
/// never terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestStatus {
    Starting,
    FindingServer,
    TestingPing,
    TestingDownload,
    TestingUpload,
    Completed,
    Error,
    Other(String),
}

impl TestStatus {
    /// Wire name of this status
    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "starting",
            Self::FindingServer => "finding_server",
            Self::TestingPing => "testing_ping",
            Self::TestingDownload => "testing_download",
            Self::TestingUpload => "testing_upload",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Other(raw) => raw,
        }
    }

    /// `completed` and `error` end the polling loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl From<String> for TestStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "starting" => Self::Starting,
            "finding_server" => Self::FindingServer,
            "testing_ping" => Self::TestingPing,
            "testing_download" => Self::TestingDownload,
            "testing_upload" => Self::TestingUpload,
            "completed" => Self::Completed,
            "error" => Self::Error,
            _ => Self::Other(value),
        }
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        match status {
            TestStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Test server chosen by the measurement service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub sponsor: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

/// One status payload returned by `GET /api/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: TestStatus,
    #[serde(default)]
    pub server: Option<ServerInfo>,
    /// Latency in milliseconds
    #[serde(default)]
    pub ping: Option<f64>,
    /// Download throughput in Mbps
    #[serde(default)]
    pub download: Option<f64>,
    /// Upload throughput in Mbps
    #[serde(default)]
    pub upload: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusSnapshot {
    /// Snapshot carrying only a status
    pub fn new(status: TestStatus) -> Self {
        Self {
            status,
            server: None,
            ping: None,
            download: None,
            upload: None,
            error: None,
        }
    }

    pub fn with_server(mut self, server: ServerInfo) -> Self {
        self.server = Some(server);
        self
    }

    pub fn with_ping(mut self, ping: f64) -> Self {
        self.ping = Some(ping);
        self
    }

    pub fn with_download(mut self, download: f64) -> Self {
        self.download = Some(download);
        self
    }

    pub fn with_upload(mut self, upload: f64) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn with_error<S: Into<String>>(mut self, error: S) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Results of a finished test, taken from the last snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinalResults {
    pub ping: Option<f64>,
    pub download: Option<f64>,
    pub upload: Option<f64>,
    pub server: Option<ServerInfo>,
}

impl From<&StatusSnapshot> for FinalResults {
    fn from(snapshot: &StatusSnapshot) -> Self {
        Self {
            ping: snapshot.ping,
            download: snapshot.download,
            upload: snapshot.upload,
            server: snapshot.server.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_snapshot_deserialization() {
        let json = r#"{
            "status": "testing_upload",
            "server": {"sponsor": "Acme ISP", "name": "Berlin", "country": "Germany"},
            "ping": 12.5,
            "download": 93.21,
            "upload": 18.4,
            "error": null
        }"#;

        let snapshot: StatusSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.status, TestStatus::TestingUpload);
        assert_eq!(snapshot.server.as_ref().unwrap().sponsor, "Acme ISP");
        assert_eq!(snapshot.ping, Some(12.5));
        assert_eq!(snapshot.download, Some(93.21));
        assert_eq!(snapshot.upload, Some(18.4));
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn test_missing_and_null_fields_are_none() {
        let snapshot: StatusSnapshot =
            serde_json::from_str(r#"{"status": "starting", "ping": null}"#).unwrap();
        assert_eq!(snapshot, StatusSnapshot::new(TestStatus::Starting));
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let snapshot: StatusSnapshot = serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        assert_eq!(snapshot.status, TestStatus::Other("running".to_string()));
        assert!(!snapshot.status.is_terminal());
        assert_eq!(snapshot.status.to_string(), "running");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TestStatus::Completed.is_terminal());
        assert!(TestStatus::Error.is_terminal());
        assert!(!TestStatus::TestingDownload.is_terminal());
        assert!(!TestStatus::Starting.is_terminal());
    }

    #[test]
    fn test_status_serializes_to_wire_name() {
        let json = serde_json::to_string(&TestStatus::FindingServer).unwrap();
        assert_eq!(json, "\"finding_server\"");
    }

    #[test]
    fn test_final_results_from_snapshot() {
        let snapshot = StatusSnapshot::new(TestStatus::Completed)
            .with_ping(9.0)
            .with_download(250.0)
            .with_upload(40.0);
        let results = FinalResults::from(&snapshot);
        assert_eq!(results.ping, Some(9.0));
        assert_eq!(results.download, Some(250.0));
        assert_eq!(results.upload, Some(40.0));
        assert!(results.server.is_none());
    }
}
