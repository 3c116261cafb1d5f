//! vhost-fallback translation service
//!
//! Maps each request's host identity to a document root using a
//! `VirtualDocumentRootWithFallback` template, and answers with the mapping.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!                   │                  vhost-fallback                      │
//!                   │                                                      │
//!   Request         │  ┌─────────┐   ┌───────────┐   ┌──────────────────┐  │
//!   ────────────────┼─▶│  http   │──▶│  routing  │──▶│ alias → userdir  │  │
//!                   │  │ server  │   │ pipeline  │   │ → vhost → docroot│  │
//!                   │  └─────────┘   └───────────┘   └────────┬─────────┘  │
//!                   │                                         │            │
//!                   │                                         ▼            │
//!   JSON mapping    │  ┌──────────┐                  ┌──────────────────┐  │
//!   ◀───────────────┼──│ response │◀─────────────────│ vhost engine     │  │
//!                   │  └──────────┘                  │ labels/interp/fs │  │
//!                   │                                └──────────────────┘  │
//!                   │  ┌────────────────────────────────────────────────┐  │
//!                   │  │ config (load/validate/scopes/watch) │ logging  │  │
//!                   │  │ metrics │ lifecycle                            │  │
//!                   │  └────────────────────────────────────────────────┘  │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use vhost_fallback::config::{load_config, watcher::ConfigWatcher};
use vhost_fallback::http::HttpServer;
use vhost_fallback::lifecycle::Shutdown;
use vhost_fallback::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "vhost-fallback")]
#[command(about = "Virtual document roots with fallback, as a translation service", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "VHOST_FALLBACK_CONFIG", default_value = "vhost-fallback.toml")]
    config: PathBuf,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Do not reload the configuration when the file changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.service.observability);

    tracing::info!("vhost-fallback v{} starting", env!("CARGO_PKG_VERSION"));

    let bind_address = cli
        .bind
        .clone()
        .unwrap_or_else(|| config.service.listener.bind_address.clone());

    tracing::info!(
        path = %cli.config.display(),
        bind_address = %bind_address,
        scopes = config.scopes.len(),
        request_timeout_secs = config.service.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.service.observability.metrics_enabled {
        match config.service.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.service.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let (watcher, config_updates) = ConfigWatcher::new(&cli.config);
    let _watcher = if cli.no_watch {
        None
    } else {
        Some(watcher.run()?)
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.trigger();
        }
    });

    HttpServer::new(config).run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
