//! Configuration loaders for success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use review_config::{Config, SocketEndpoint};
use tempfile::TempDir;

use crate::bootstrap::ConfigLoader;

/// Loader whose socket lives in a private temporary directory, or on an
/// ephemeral loopback port where Unix sockets are unavailable.
#[derive(Clone)]
pub struct TestConfigLoader {
    endpoint: SocketEndpoint,
    _socket_dir: Arc<TempDir>,
}

impl TestConfigLoader {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary directory for socket");
        let endpoint = if cfg!(unix) {
            let path = dir.path().join("run").join("reviewd.sock");
            SocketEndpoint::unix(path.to_str().expect("socket path is UTF-8"))
        } else {
            SocketEndpoint::tcp("127.0.0.1", 0)
        };
        Self {
            endpoint,
            _socket_dir: Arc::new(dir),
        }
    }

    /// Loader listening on an explicit loopback port.
    pub fn tcp(port: u16) -> Self {
        Self {
            endpoint: SocketEndpoint::tcp("127.0.0.1", port),
            ..Self::new()
        }
    }

    pub fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            listen_socket: self.endpoint.clone(),
            log_filter: "reviewd=debug".to_owned(),
            ..Config::default()
        })
    }
}

/// Loader that fails by passing an unusable socket URL on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter([
            OsString::from("reviewd"),
            OsString::from("--listen-socket"),
            OsString::from("invalid://socket"),
        ])
    }
}
