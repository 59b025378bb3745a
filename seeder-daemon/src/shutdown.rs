//! Termination signals

use anyhow::Context;
use tokio::signal;

/// Waits for SIGINT or SIGTERM and returns the signal's name
pub async fn wait_for_signal() -> anyhow::Result<&'static str> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("failed to install SIGTERM handler")?;

    #[cfg(unix)]
    let terminate = async move {
        terminate.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("failed to install Ctrl+C handler")?;
            Ok("SIGINT")
        }
        _ = terminate => Ok("SIGTERM"),
    }
}
