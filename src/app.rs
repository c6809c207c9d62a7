//! Main application orchestration and execution

use crate::{
    cli::Cli,
    client::HttpMeasurementClient,
    config::{display_config_summary, load_config, validate_config},
    error::{AppError, Result},
    logging::{Logger, LoggerFactory},
    models::Config,
    output::{SummaryFormatterFactory, TerminalPresenter},
    session::{SessionController, SessionOutcome, SessionSettings},
};
use std::io::Write;
use std::sync::Arc;

/// Build metadata stamped by the build script
pub fn build_info() -> String {
    [
        format!("{} v{}", crate::PKG_NAME, crate::VERSION),
        format!("Built: {}", option_env!("BUILD_TIME").unwrap_or("unknown")),
        format!("Commit: {}", option_env!("GIT_COMMIT").unwrap_or("unknown")),
        format!("Target: {}", option_env!("TARGET_TRIPLE").unwrap_or("unknown")),
    ]
    .join("\n")
}

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::config)?;
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        if self.cli.build_info {
            println!("{}", build_info());
            return Ok(());
        }

        if self.cli.should_show_topic_help() {
            println!("{}", self.cli.display_help());
            return Ok(());
        }

        let config = load_config(self.cli.clone())?;
        let warnings = validate_config(&config)?;

        if self.cli.show_config {
            println!("{}", display_config_summary(&config));
            for warning in &warnings {
                println!("  {}", warning.format(config.enable_color));
            }
            return Ok(());
        }

        let factory = LoggerFactory::new(config.clone());
        let logger = factory.create_logger("APP").await;

        for warning in &warnings {
            eprintln!("{}", warning.format(config.enable_color));
        }

        logger
            .debug("Configuration loaded")
            .field("service_url", &config.service_url)
            .field("poll_interval_ms", config.poll_interval_ms)
            .field("settle_delay_ms", config.settle_delay_ms)
            .field("timeout_seconds", config.timeout_seconds)
            .log()
            .await;

        let client = HttpMeasurementClient::from_config(&config)?
            .with_logger(factory.create_network_logger().await);
        let client = Arc::new(client);

        // JSON mode keeps stdout for the document and draws progress on stderr
        let outcome = if config.json_output {
            let presenter = TerminalPresenter::stderr(config.enable_color);
            run_session(client, presenter, &config, &factory).await?
        } else {
            let presenter = TerminalPresenter::stdout(config.enable_color);
            run_session(client, presenter, &config, &factory).await?
        };

        report_outcome(outcome, &config, &logger).await
    }
}

async fn run_session<W: Write + Send + 'static>(
    client: Arc<HttpMeasurementClient>,
    presenter: TerminalPresenter<W>,
    config: &Config,
    factory: &LoggerFactory,
) -> Result<SessionOutcome> {
    let mut controller = SessionController::new(client, presenter, SessionSettings::from_config(config))
        .with_logger(factory.create_session_logger().await);

    controller.run().await
}

async fn report_outcome(outcome: SessionOutcome, config: &Config, logger: &Logger) -> Result<()> {
    if !matches!(outcome, SessionOutcome::Completed(_)) {
        logger
            .warn("Test did not complete")
            .field("outcome", outcome.label())
            .log()
            .await;
    }
    let results = outcome.into_result()?;

    logger
        .info("Test completed")
        .field("ping", results.ping)
        .field("download", results.download)
        .field("upload", results.upload)
        .log()
        .await;

    let summary = SummaryFormatterFactory::create(config).format_results(&results)?;
    if !config.json_output {
        println!();
    }
    println!("{}", summary);

    Ok(())
}
