//! # Intake Server
//!
//! ```text
//! intake-server --config ./config.yml
//!
//!   load config.yml ──► bind host:port ──► open browser ──► serve
//!                                                             │
//!                              Ctrl-C / SIGTERM ──► graceful shutdown
//! ```

use std::sync::Arc;

use anyhow::Context;
use intake_server::{router, shutdown_signal, viewer, AppState, Cli, PdftkBackend, Server};
use intake_store::ReferenceLedger;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::from_env();
    info!(config = ?cli.config, "Starting intake server...");

    let ledger = ReferenceLedger::open(&cli.config)
        .inspect_err(|e| {
            error!(
                config = ?cli.config,
                startup_fatal = e.is_startup_fatal(),
                error = %e,
                "Configuration unusable"
            )
        })
        .with_context(|| format!("cannot load configuration from '{}'", cli.config.display()))?;
    let config = ledger.snapshot().await;
    let timeouts = config.server.timeout;

    let state = AppState::new(Arc::new(ledger), Arc::new(PdftkBackend::default()));
    let app = router(state, timeouts);

    let server = Server::bind(&config.server.bind_address(), app, timeouts.shutdown()).await?;
    info!(
        addr = %config.server.bind_address(),
        next_reference = %config.peek_reference(),
        save_path = ?config.server.save_path,
        read_timeout = ?timeouts.read(),
        write_timeout = ?timeouts.write(),
        idle_timeout = ?timeouts.idle(),
        "Intake server listening"
    );

    if config.server.launch_viewer {
        viewer::open(config.server.local_url());
    }

    server.run(shutdown_signal()).await?;
    Ok(())
}
