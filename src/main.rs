//! Notifier - command-line entry point
//!
//! Loads the configuration, wires the pipeline to the console and sends
//! each message given on the command line.

use anyhow::Result;
use clap::Parser;
use notifier::{
    cli::Cli,
    clock::SystemClock,
    config::Config,
    pipeline::build_pipeline,
    sink::StdoutSink,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Logging is not configured yet; set up a plain one for this error.
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    // Logs go to stderr so stdout only carries delivered notifications.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Notifier starting up...");
    info!(
        logger = config.observers.logger,
        failure_policy = ?config.observers.failure_policy,
        log_format = ?config.observers.log_format,
        timeout_ms = config.delivery.timeout_ms,
        email = config.delivery.email.is_some(),
        sms = config.delivery.sms.is_some(),
        popup = config.delivery.popup,
        "Configuration loaded"
    );

    let pipeline = build_pipeline(&config, Arc::new(StdoutSink), Arc::new(SystemClock))?;

    let mut failed = 0usize;
    for message in &cli.messages {
        let content = pipeline.compose(message, cli.sign, cli.timestamp);
        match pipeline.send(content).await {
            Ok(report) => {
                for failure in &report.failures {
                    warn!(observer = %failure.observer, reason = %failure.reason, "Observer reported a failure");
                }
                if !report.is_success() {
                    failed += 1;
                }
            }
            Err(e) => {
                error!("Failed to send notification: {}", e);
                failed += 1;
            }
        }
    }

    info!(
        sent = pipeline.service.history_len(),
        failed,
        "All notifications processed"
    );
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
