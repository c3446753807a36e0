//! Daemon bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use review_config::{Config, SocketPreparationError};
use review_ledger::Ledger;

use crate::dispatch::DispatchConnectionHandler;
use crate::health::HealthReporter;
use crate::service::{ReviewService, ServiceOptions};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

/// Source of the daemon configuration.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`], reading the process arguments
/// and environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The socket directory could not be prepared.
    #[error("failed to prepare daemon socket: {source}")]
    Socket {
        /// Filesystem error reported while preparing the socket directory.
        #[source]
        source: SocketPreparationError,
    },
}

/// A bootstrapped daemon, ready to serve.
pub struct Daemon<L> {
    config: Config,
    service: Arc<ReviewService<L>>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl<L> Daemon<L>
where
    L: Ledger + 'static,
{
    /// The resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The review service requests are dispatched to.
    #[must_use]
    pub fn service(&self) -> &ReviewService<L> {
        &self.service
    }

    /// The telemetry handle obtained during bootstrap.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Binds the configured socket and starts accepting invocations.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when the socket cannot be bound or the
    /// accept loop cannot start.
    pub fn serve(&self) -> Result<ListenerHandle, ListenerError> {
        let endpoint = self.config.listen_socket();
        let handler = Arc::new(DispatchConnectionHandler::new(Arc::clone(&self.service)));
        let started = SocketListener::bind(endpoint).and_then(|listener| listener.start(handler));
        match &started {
            Ok(_) => self.reporter.listener_ready(endpoint),
            Err(error) => self.reporter.listener_failed(error),
        }
        started
    }
}

/// Bootstraps the daemon over `ledger`.
///
/// Loads configuration, installs telemetry, prepares the socket directory
/// and builds the review service, reporting each outcome to `reporter`.
///
/// # Errors
///
/// Returns the first [`BootstrapError`] encountered.
pub fn bootstrap_with<L>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    ledger: L,
) -> Result<Daemon<L>, BootstrapError>
where
    L: Ledger + 'static,
{
    reporter.bootstrap_starting();

    let prepared = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })
        .and_then(|config| {
            let telemetry = telemetry::initialise(&config)
                .map_err(|source| BootstrapError::Telemetry { source })?;
            config
                .listen_socket()
                .prepare_filesystem()
                .map_err(|source| BootstrapError::Socket { source })?;
            Ok((config, telemetry))
        });

    let (config, telemetry) = match prepared {
        Ok(prepared) => prepared,
        Err(error) => {
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let service = Arc::new(ReviewService::new(
        ledger,
        ServiceOptions::from_config(&config),
    ));
    reporter.bootstrap_succeeded(&config);

    Ok(Daemon {
        config,
        service,
        telemetry,
        reporter,
    })
}
