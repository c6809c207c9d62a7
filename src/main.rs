//! Speed Test Monitor - Main CLI Application
//!
//! Starts a run on a speed test service, follows it live in the terminal and
//! prints the final figures with quality ratings.

use clap::Parser;
use speedtest_monitor::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter, Result},
    PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!("Debug mode enabled");
    }

    App::new(cli)?.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - The service URL must start with http:// or https://");
            eprintln!("  - Run with --help-topic config for limits");
        }
        AppError::Network(_) | AppError::PollFailure(_) | AppError::Timeout(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check that the speed test service is running");
            eprintln!("  - Verify the URL passed with --url or SPEEDTEST_URL");
            eprintln!("  - Increase the request timeout with --timeout");
        }
        AppError::StartFailure(_) => {
            eprintln!();
            eprintln!("The service refused to start a test:");
            eprintln!("  - Another test may still be running; wait and retry");
        }
        _ => {}
    }
}
