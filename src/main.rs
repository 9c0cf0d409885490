//! Page Gate entry point.
//!
//! Initializes logging, loads configuration, validates the content root and
//! deny-list, and starts the configured transport.

use anyhow::Result;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use page_gate::core::config::LoggingConfig;
use page_gate::core::{Config, PageServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Before Config::from_env, which logs.
    init_logging(&LoggingConfig::from_env().level);

    let config = Config::from_env();

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Content root: {} ({} deny-list entries)",
        config.security.content_root.display(),
        config.security.deny_list.len()
    );

    // Refuse to start on a bad content root or deny-list.
    let server = PageServer::new(config.clone()).inspect_err(|e| error!("{}", e))?;

    info!("Server initialized");

    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr so the STDIO transport keeps stdout clean.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
