//! Foreground daemon entry point.

use std::io;
use std::sync::Arc;

use review_ledger::{Ledger, MemoryLedger};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

use crate::bootstrap::{BootstrapError, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::ListenerError;

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors that end the daemon process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrap failed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The listener failed to start or its thread panicked.
    #[error("listener failed: {0}")]
    Listener(#[from] ListenerError),
    /// Signal handlers could not be installed.
    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),
}

/// Runs the daemon over an in-memory ledger until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns [`LaunchError`] if bootstrap, signal registration or the listener
/// fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    let signals = Signals::new([SIGINT, SIGTERM]).map_err(LaunchError::Signals)?;
    run_until_signalled(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        MemoryLedger::new(),
        signals,
    )
}

/// Serves until `signals` reports a shutdown, then stops the listener.
///
/// `signals` must already be registered when this is called.
pub(crate) fn run_until_signalled<L, S>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    ledger: L,
    mut signals: S,
) -> Result<(), LaunchError>
where
    L: Ledger + 'static,
    S: ShutdownSignal,
{
    let daemon = bootstrap_with(loader, Arc::clone(&reporter), ledger)?;
    let listener = daemon.serve()?;

    let signal = signals.wait();
    reporter.shutdown_requested(signal);
    listener.stop()?;
    info!(target: PROCESS_TARGET, "daemon stopped");
    Ok(())
}

/// Blocks until the process should shut down.
pub(crate) trait ShutdownSignal {
    /// Waits for a shutdown request and returns its signal number.
    fn wait(&mut self) -> i32;
}

impl ShutdownSignal for Signals {
    fn wait(&mut self) -> i32 {
        self.forever().next().unwrap_or(SIGTERM)
    }
}
