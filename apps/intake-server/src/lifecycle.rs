//! # Server Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Server::bind(host:port) ── fails ──► LifecycleError::Bind             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  spawn axum::serve ─────────────────────── ends early ──► Serve        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  await shutdown signal (Ctrl-C / SIGTERM)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stop accepting, wait for in-flight handlers                           │
//! │       │                                                                 │
//! │       ├── done within timeout.server ──► Ok                            │
//! │       └── still running ───────────────► ShutdownTimeout               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! In-flight handlers are not cancelled by the timeout; the server task is
//! abandoned and the process exits.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::error::LifecycleError;

/// A bound, not yet running HTTP server.
pub struct Server {
    listener: TcpListener,
    app: Router,
    shutdown_timeout: Duration,
}

impl Server {
    /// Binds the listener. Failing to bind is fatal to startup.
    pub async fn bind(
        addr: &str,
        app: Router,
        shutdown_timeout: Duration,
    ) -> Result<Self, LifecycleError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| LifecycleError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Server {
            listener,
            app,
            shutdown_timeout,
        })
    }

    /// The address actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until `signal` resolves, then shuts down gracefully within
    /// the configured timeout.
    pub async fn run<F>(self, signal: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()> + Send,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let Server {
            listener,
            app,
            shutdown_timeout,
        } = self;

        let mut handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tokio::select! {
            _ = signal => {
                info!(timeout = ?shutdown_timeout, "Shutdown signal received, starting graceful shutdown");
            }
            result = &mut handle => {
                let reason = match result {
                    Ok(Ok(())) => "server exited before shutdown was requested".to_string(),
                    Ok(Err(e)) => e.to_string(),
                    Err(e) => e.to_string(),
                };
                error!(%reason, "HTTP server stopped");
                return Err(LifecycleError::Serve(reason));
            }
        }

        let _ = shutdown_tx.send(());

        match tokio::time::timeout(shutdown_timeout, &mut handle).await {
            Ok(Ok(Ok(()))) => {
                info!("Server shutdown complete");
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(LifecycleError::Serve(e.to_string())),
            Ok(Err(e)) => Err(LifecycleError::Serve(e.to_string())),
            Err(_) => {
                handle.abort();
                error!(timeout = ?shutdown_timeout, "Graceful shutdown timed out");
                Err(LifecycleError::ShutdownTimeout {
                    timeout: shutdown_timeout,
                })
            }
        }
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
