//! Lifecycle events surfaced to operators.

use std::sync::Arc;

use review_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;
use crate::transport::ListenerError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer for daemon lifecycle events.
pub trait HealthReporter: Send + Sync {
    /// Configuration loading is about to begin.
    fn bootstrap_starting(&self);

    /// Bootstrap finished.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Bootstrap failed.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// The listener is accepting connections.
    fn listener_ready(&self, endpoint: &SocketEndpoint);

    /// The listener could not be started.
    fn listener_failed(&self, error: &ListenerError);

    /// A shutdown was requested, typically by a signal.
    fn shutdown_requested(&self, signal: i32);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        (**self).listener_ready(endpoint);
    }

    fn listener_failed(&self, error: &ListenerError) {
        (**self).listener_failed(error);
    }

    fn shutdown_requested(&self, signal: i32) {
        (**self).shutdown_requested(signal);
    }
}

/// Reporter that emits each event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            socket = %config.listen_socket(),
            log_format = %config.log_format(),
            field_limits = %config.field_limits(),
            corrupt_records = %config.corrupt_records(),
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listener_ready",
            endpoint = %endpoint,
            "accepting invocations"
        );
    }

    fn listener_failed(&self, error: &ListenerError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "listener_failed",
            error = %error,
            "listener failed to start"
        );
    }

    fn shutdown_requested(&self, signal: i32) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_requested",
            signal,
            "shutting down"
        );
    }
}
