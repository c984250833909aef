//! HTTP server utility methods
//!
//! This module provides utility methods for the HttpServer.

use crate::server::server::HttpServer;
use crate::utils::error::MonitorError;
use tracing::{info, warn};

impl HttpServer {
    /// Graceful shutdown signal handler
    pub async fn shutdown_signal() {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
                Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                    info!("Received terminate signal, shutting down gracefully");
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
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

    /// Format a user-friendly error message for port binding failures
    pub(crate) fn format_bind_error(
        error: std::io::Error,
        bind_addr: &str,
        port: u16,
    ) -> MonitorError {
        match error.kind() {
            std::io::ErrorKind::AddrInUse => MonitorError::server(format!(
                "Port {} is already in use. Stop the other process or start with --port {}",
                port,
                port.saturating_add(1)
            )),
            std::io::ErrorKind::PermissionDenied => MonitorError::server(format!(
                "Permission denied for port {}. Use a port >= 1024, e.g. --port 8080",
                port
            )),
            _ => MonitorError::server(format!("Failed to bind to {}: {}", bind_addr, error)),
        }
    }
}
