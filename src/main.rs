//! burrow server binary.
//!
//! Loads configuration, registers the demo routes and serves them until
//! Ctrl+C.

use std::path::PathBuf;

use clap::Parser;

use burrow::config::{self, ServerConfig};
use burrow::lifecycle::{self, Shutdown};
use burrow::net::Listener;
use burrow::observability::{logging, metrics};
use burrow::templates::ViewRenderer;
use burrow::{demo, Engine, HttpServer};

#[derive(Parser, Debug)]
#[command(name = "burrow", version, about = "Minimal embedded HTTP server")]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Directory to serve static files from.
    #[arg(long)]
    static_root: Option<String>,

    /// Directory holding view templates.
    #[arg(long)]
    templates: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(root) = cli.static_root {
        config.static_files.root = Some(root);
    }
    if let Some(root) = cli.templates {
        config.templates.root = root;
    }
    config::validate_config(&config).map_err(config::ConfigError::Validation)?;

    logging::init(&config.observability.log_level);
    tracing::info!("burrow v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        workers = config.pool.workers,
        queue_capacity = config.pool.queue_capacity,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let routes = demo::routes(ViewRenderer::from_config(&config.templates))?;
    let engine = Engine::from_config(&config, routes)?;

    let listener = match Listener::bind(&config.listener).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Failed to bind listener");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(lifecycle::wait_for_ctrl_c(shutdown.clone()));

    HttpServer::new(config, engine).run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
