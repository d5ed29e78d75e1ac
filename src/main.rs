use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use route_dispatch::config::process_env;
use route_dispatch::lifecycle::signals::spawn_signal_listener;
use route_dispatch::lifecycle::{resolve_config, StartupOptions};
use route_dispatch::observability::init_logging;
use route_dispatch::upgrade::{EchoHandler, UpgradeDispatcher};
use route_dispatch::{routes, HttpServer, RouteTable, Shutdown};

/// Filesystem-routed HTTP server.
#[derive(Debug, Parser)]
#[command(name = "route-dispatch", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "ROUTE_DISPATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Development mode: debug level, pretty logs.
    #[arg(long, visible_alias = "development")]
    dev: bool,
}

impl From<Cli> for StartupOptions {
    fn from(cli: Cli) -> Self {
        Self {
            config_path: cli.config,
            host: cli.host,
            port: cli.port,
            development: cli.dev,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let options = StartupOptions::from(Cli::parse());

    let config = match resolve_config(&options, process_env) {
        Ok(config) => config,
        Err(err) => {
            // Logging is not configured yet.
            eprintln!("Error initializing the server: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability, config.environment.development);

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Error initializing the server");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: route_dispatch::ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("route-dispatch v{} starting", env!("CARGO_PKG_VERSION"));

    let routes = RouteTable::build(routes::discovered())?;

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, routes, Some(UpgradeDispatcher::new(EchoHandler)));
    server.log_routes();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    server.run(listener, receiver).await?;
    Ok(())
}
