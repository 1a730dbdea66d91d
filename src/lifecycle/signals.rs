//! OS signal handling.
//!
//! Only Ctrl+C (SIGINT) is handled; it triggers a graceful shutdown.

use crate::lifecycle::Shutdown;

/// Wait for Ctrl+C, then trigger `shutdown`.
///
/// If the handler cannot be installed the error is logged and shutdown is
/// never triggered from here.
pub async fn wait_for_ctrl_c(shutdown: Shutdown) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Ctrl+C received");
            shutdown.trigger();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    }
}
