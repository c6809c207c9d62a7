//! End-to-end tests against a mock speed test service
//!
//! The library tests drive a real `SessionController` over HTTP; the binary
//! tests run `stmon` itself against the same kind of mock.

use assert_cmd::prelude::*;
use serde_json::{json, Value};
use speedtest_monitor::{
    output::DashboardState,
    session::{SessionController, SessionOutcome, SessionSettings},
    HttpMeasurementClient,
};
use std::process::{Command, Output};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_settings() -> SessionSettings {
    SessionSettings {
        poll_interval: Duration::from_millis(50),
        settle_delay: Duration::from_millis(50),
        chart_capacity: 20,
    }
}

async fn mock_start(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/start-test"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve the given status bodies once each, in order, then repeat the last
async fn mock_status_sequence(server: &MockServer, bodies: Vec<Value>) {
    let last = bodies.len().saturating_sub(1);
    for (i, body) in bodies.into_iter().enumerate() {
        let mock = Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body));
        let mock = if i == last { mock } else { mock.up_to_n_times(1) };
        mock.mount(server).await;
    }
}

async fn status_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/api/status")
        .count()
}

fn controller(server: &MockServer) -> SessionController<HttpMeasurementClient, DashboardState> {
    let client = HttpMeasurementClient::new(&server.uri(), Duration::from_secs(2)).unwrap();
    SessionController::new(Arc::new(client), DashboardState::new(), fast_settings())
}

fn server_info() -> Value {
    json!({"sponsor": "Acme ISP", "name": "Berlin", "country": "Germany"})
}

fn full_run() -> Vec<Value> {
    vec![
        json!({"status": "starting"}),
        json!({"status": "finding_server", "server": server_info()}),
        json!({"status": "testing_ping", "server": server_info(), "ping": 18.2}),
        json!({"status": "testing_download", "server": server_info(), "ping": 18.2, "download": 120.5}),
        json!({"status": "testing_upload", "server": server_info(), "ping": 18.2, "download": 120.5, "upload": 35.5}),
        json!({"status": "completed", "server": server_info(), "ping": 18.2, "download": 120.5, "upload": 35.5}),
    ]
}

#[tokio::test]
async fn test_download_snapshot_reaches_dashboard() {
    let server = MockServer::start().await;
    mock_start(&server, 200, json!({"status": "started"})).await;
    mock_status_sequence(&server, vec![json!({"status": "testing_download", "download": 42})]).await;

    let mut controller = controller(&server);
    controller.start().await.unwrap();

    let reached = tokio::time::timeout(Duration::from_secs(5), async {
        while !controller.with_presenter(|p| p.progress == 50).await {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(reached.is_ok(), "dashboard never showed the download phase");

    controller
        .with_presenter(|p| {
            assert_eq!(p.download.value, "42");
            assert_eq!(p.download.quality, "Fair");
            assert_eq!(p.download.bar_percent, 50);
            assert_eq!(p.status_text, "Testing download speed...");
            assert_eq!(p.speedometer.target(), 42.0);
        })
        .await;
    assert!(controller.is_active().await);
}

#[tokio::test]
async fn test_full_session_over_http() {
    let server = MockServer::start().await;
    mock_start(&server, 200, json!({"status": "started"})).await;
    mock_status_sequence(&server, full_run()).await;

    let mut controller = controller(&server);
    let outcome = controller.run().await.unwrap();

    let SessionOutcome::Completed(results) = outcome else {
        panic!("expected completion, got {:?}", outcome);
    };
    assert_eq!(results.download, Some(120.5));
    assert_eq!(results.upload, Some(35.5));
    assert_eq!(status_requests(&server).await, 6);

    controller
        .with_presenter(|p| {
            assert_eq!(p.status_text, "Test completed successfully!");
            assert!(p.start_enabled);
            assert_eq!(p.ping.quality, "Excellent");
            assert_eq!(p.download.quality, "Excellent");
            assert_eq!(p.upload.quality, "Fair");
            assert_eq!(p.server_panel(), "Acme ISP (Berlin, Germany)");
        })
        .await;

    // no polling once the session is over
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(status_requests(&server).await, 6);
}

#[tokio::test]
async fn test_status_endpoint_failure_stops_polling() {
    let server = MockServer::start().await;
    mock_start(&server, 200, json!({"status": "started"})).await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let outcome = controller.run().await.unwrap();
    assert_eq!(outcome, SessionOutcome::ConnectionLost("Server error".to_string()));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(status_requests(&server).await, 1);
    controller
        .with_presenter(|p| {
            assert_eq!(p.status_text, "Error: Connection error: Server error");
            assert!(p.start_enabled);
        })
        .await;
}

#[tokio::test]
async fn test_rejected_start_never_polls() {
    let server = MockServer::start().await;
    mock_start(&server, 409, json!({"error": "Test already in progress"})).await;

    let mut controller = controller(&server);
    let err = controller.start().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to start test: Test already in progress");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(status_requests(&server).await, 0);
}

async fn run_binary(server: &MockServer, extra: &[&str]) -> Output {
    let mut args = vec![
        "--url".to_string(),
        server.uri(),
        "--poll-interval".to_string(),
        "50".to_string(),
        "--settle-delay".to_string(),
        "50".to_string(),
        "--no-color".to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));

    tokio::task::spawn_blocking(move || {
        let dir = TempDir::new().unwrap();
        Command::cargo_bin("stmon")
            .unwrap()
            .current_dir(dir.path())
            .env_remove("SPEEDTEST_URL")
            .env_remove("POLL_INTERVAL_MS")
            .env_remove("SETTLE_DELAY_MS")
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_prints_json_summary() {
    let server = MockServer::start().await;
    mock_start(&server, 200, json!({"status": "started"})).await;
    mock_status_sequence(&server, full_run()).await;

    let output = run_binary(&server, &["--json"]).await;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["download"], 120.5);
    assert_eq!(report["upload_quality"]["label"], "Fair");
    assert_eq!(report["server"]["sponsor"], "Acme ISP");

    // progress went to stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Test completed successfully!"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_plain_progress_and_summary() {
    let server = MockServer::start().await;
    mock_start(&server, 200, json!({"status": "started"})).await;
    mock_status_sequence(&server, full_run()).await;

    let output = run_binary(&server, &[]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[  5%] Initializing test..."));
    assert!(stdout.contains("[ 50%] Testing download speed..."));
    assert!(stdout.contains("[100%] Test completed successfully!"));
    assert!(stdout.contains("Speed Test Results"));
    assert!(stdout.contains("120.5 Mbps"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_server_reported_error() {
    let server = MockServer::start().await;
    mock_start(&server, 200, json!({"status": "started"})).await;
    mock_status_sequence(
        &server,
        vec![
            json!({"status": "testing_ping", "ping": 30}),
            json!({"status": "error", "error": "Network unreachable"}),
        ],
    )
    .await;

    let output = run_binary(&server, &[]).await;
    assert_eq!(output.status.code(), Some(6));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Error: Network unreachable"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Test failed: Network unreachable"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_poll_failure_exit_code() {
    let server = MockServer::start().await;
    mock_start(&server, 200, json!({"status": "started"})).await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = run_binary(&server, &[]).await;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Connection error: Server error"));
}
