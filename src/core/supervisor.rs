//! Process-level wait on the long-running tasks

use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("monitoring loop stopped unexpectedly: {0}")]
    MonitorStopped(String),

    #[error("HTTP server stopped unexpectedly: {0}")]
    ServerStopped(String),
}

fn describe(result: Result<(), tokio::task::JoinError>) -> String {
    match result {
        Ok(()) => "task returned".to_string(),
        Err(e) => e.to_string(),
    }
}

/// Wait until `shutdown` resolves or either task ends.
///
/// Only a requested shutdown is a clean exit. Both tasks run forever, so
/// either of them finishing is an error.
pub async fn supervise<S>(
    shutdown: S,
    monitor: JoinHandle<()>,
    server: JoinHandle<()>,
) -> Result<(), ShutdownError>
where
    S: Future<Output = ()>,
{
    tokio::select! {
        _ = shutdown => {
            info!("Bot shutting down manually.");
            Ok(())
        }
        result = monitor => {
            let reason = describe(result);
            error!(reason = %reason, "Monitoring loop stopped");
            Err(ShutdownError::MonitorStopped(reason))
        }
        result = server => {
            let reason = describe(result);
            error!(reason = %reason, "HTTP server stopped");
            Err(ShutdownError::ServerStopped(reason))
        }
    }
}
