//! HTTP client for the measurement service


use crate::{
    error::{AppError, Result},
    logging::NetworkLogger,
    models::{Config, StatusSnapshot},
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// The two endpoints the session controller talks to
#[async_trait]
pub trait MeasurementService: Send + Sync {
    /// `POST /api/start-test`. A rejected request yields
    /// [`AppError::StartFailure`] carrying the service's reason.
    async fn start_test(&self) -> Result<()>;

    /// `GET /api/status`
    async fn fetch_status(&self) -> Result<StatusSnapshot>;
}

/// Optional `error` field of a non-2xx start response
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

const DEFAULT_START_ERROR: &str = "Failed to start test";
const DEFAULT_STATUS_ERROR: &str = "Server error";

/// reqwest-backed [`MeasurementService`]
pub struct HttpMeasurementClient {
    client: Client,
    base_url: String,
    logger: NetworkLogger,
}

impl HttpMeasurementClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(base_url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::validation(format!("Unsupported URL scheme: {}", parsed.scheme())));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("speedtest-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            logger: NetworkLogger::silent(),
        })
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.service_url, config.timeout())
    }

    /// Attach a network logger
    pub fn with_logger(mut self, logger: NetworkLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_logged(&self, method: &str, url: &str, request: reqwest::RequestBuilder) -> Result<Response> {
        let started = Instant::now();
        let result = request.send().await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let status = result.as_ref().ok().map(|r| r.status().as_u16());
        self.logger.log_http_request(url, method, status, elapsed_ms).await;

        Ok(result?)
    }
}

#[async_trait]
impl MeasurementService for HttpMeasurementClient {
    async fn start_test(&self) -> Result<()> {
        let url = self.endpoint(crate::defaults::START_TEST_PATH);
        let response = self.send_logged("POST", &url, self.client.post(&url)).await?;

        if response.status().is_success() {
            return Ok(());
        }

        // The body is advisory; anything unparsable falls back to the generic reason
        let reason = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| DEFAULT_START_ERROR.to_string());

        Err(AppError::start_failure(reason))
    }

    async fn fetch_status(&self) -> Result<StatusSnapshot> {
        let url = self.endpoint(crate::defaults::STATUS_PATH);
        let response = self.send_logged("GET", &url, self.client.get(&url)).await?;

        if !response.status().is_success() {
            return Err(AppError::http_request(DEFAULT_STATUS_ERROR));
        }

        let snapshot = response.json::<StatusSnapshot>().await?;
        Ok(snapshot)
    }
}
