//! Serve command - run the HTTP extraction service.

use std::sync::Arc;

use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use docscan_core::DocumentScanner;

use crate::server::{build_router, AppState};

use super::load_config;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long)]
    bind: Option<String>,

    /// Include error details in 500 responses
    #[arg(long)]
    debug: bool,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    config.server.debug |= args.debug;
    config.validate()?;

    info!("Starting document scanner v{}", env!("CARGO_PKG_VERSION"));

    let scanner = DocumentScanner::from_config(&config.ocr)
        .map_err(|e| anyhow::anyhow!("Failed to initialize OCR engine: {}", e))?;
    info!("OCR engine: {}", scanner.engine_description());

    if config.server.debug {
        warn!("Debug mode is on: internal error details are returned to clients");
    }

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let state = Arc::new(AppState {
        scanner,
        server: config.server,
    });
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
