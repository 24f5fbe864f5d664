//! Graceful shutdown on Ctrl+C or SIGTERM.

use std::{io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),

    #[cfg(windows)]
    #[error("failed to install Windows terminate handler: {0}")]
    Terminate(#[source] io::Error),
}

/// Signal that stopped the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopSignal {
    Interrupt,
    Terminate,
}

impl StopSignal {
    fn name(self) -> &'static str {
        match self {
            Self::Interrupt => "ctrl_c",
            Self::Terminate => "terminate",
        }
    }
}

async fn interrupted() -> Result<StopSignal, ShutdownSignalError> {
    signal::ctrl_c()
        .await
        .map_err(ShutdownSignalError::CtrlC)?;

    Ok(StopSignal::Interrupt)
}

#[cfg(unix)]
async fn terminated() -> Result<StopSignal, ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::SigTerm)?
        .recv()
        .await;

    Ok(StopSignal::Terminate)
}

#[cfg(windows)]
async fn terminated() -> Result<StopSignal, ShutdownSignalError> {
    signal::windows::ctrl_close()
        .map_err(ShutdownSignalError::Terminate)?
        .recv()
        .await;

    Ok(StopSignal::Terminate)
}

/// Wait for a stop signal, then let in-flight requests finish within `grace`.
pub(crate) async fn listen(
    handle: ServerHandle,
    grace: Option<Duration>,
) -> Result<(), ShutdownSignalError> {
    let stop = tokio::select! {
        stop = interrupted() => stop?,
        stop = terminated() => stop?,
    };

    info!(
        signal = stop.name(),
        grace_secs = grace.map(|grace| grace.as_secs()),
        "stopping beatstore api"
    );

    handle.stop_graceful(grace);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_names_are_log_friendly() {
        assert_eq!(StopSignal::Interrupt.name(), "ctrl_c");
        assert_eq!(StopSignal::Terminate.name(), "terminate");
    }
}
