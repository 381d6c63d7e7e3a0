//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, and starts the weather server
//! with the configured transport.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use weather_mcp_server::core::{Config, LoggingConfig, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    init_logging(&config.logging, !config.transport.is_stdio());

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!("Forecast upstream: {}", config.weather.base_url);

    let server = McpServer::new(config.clone())?;

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr so the STDIO transport keeps stdout for protocol
/// frames. Colors are off under STDIO, where stderr is usually captured by
/// the client.
fn init_logging(logging: &LoggingConfig, ansi: bool) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
