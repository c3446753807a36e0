//! Bootstrap scenario world: loader, reporter, daemon and listener state.

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use review_config::SocketEndpoint;
use review_ledger::MemoryLedger;
use serde_json::Value;

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, bootstrap_with};
use crate::transport::{ListenerError, ListenerHandle};

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::reporter::RecordingHealthReporter;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Scenario world shared across bootstrap steps.
pub struct TestWorld {
    loader: Box<dyn ConfigLoader>,
    endpoint: Option<SocketEndpoint>,
    pub reporter: Arc<RecordingHealthReporter>,
    daemon: Option<Daemon<MemoryLedger>>,
    bootstrap_error: Option<BootstrapError>,
    listener: Option<ListenerHandle>,
    listener_error: Option<ListenerError>,
    _occupant: Option<TcpListener>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            loader: Box::new(FailingConfigLoader),
            endpoint: None,
            reporter: Arc::new(RecordingHealthReporter::default()),
            daemon: None,
            bootstrap_error: None,
            listener: None,
            listener_error: None,
            _occupant: None,
        }
    }

    pub fn use_successful_loader(&mut self) {
        self.install(TestConfigLoader::new());
    }

    pub fn use_failing_loader(&mut self) {
        self.loader = Box::new(FailingConfigLoader);
        self.endpoint = None;
    }

    /// Points the loader at a loopback port another listener already holds.
    pub fn use_occupied_port(&mut self) {
        let occupant = TcpListener::bind(("127.0.0.1", 0)).expect("bind occupant");
        let port = occupant.local_addr().expect("occupant address").port();
        self._occupant = Some(occupant);
        self.install(TestConfigLoader::tcp(port));
    }

    fn install(&mut self, loader: TestConfigLoader) {
        self.endpoint = Some(loader.endpoint().clone());
        self.loader = Box::new(loader);
    }

    pub fn bootstrap(&mut self) {
        if self.daemon.is_some() || self.bootstrap_error.is_some() {
            return;
        }
        match bootstrap_with(&*self.loader, self.reporter.clone(), MemoryLedger::new()) {
            Ok(daemon) => self.daemon = Some(daemon),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    pub fn serve(&mut self) {
        let Some(daemon) = self.daemon.as_ref() else {
            return;
        };
        match daemon.serve() {
            Ok(handle) => self.listener = Some(handle),
            Err(error) => self.listener_error = Some(error),
        }
    }

    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    pub fn daemon_started(&self) -> bool {
        self.daemon.is_some()
    }

    pub fn listener_error(&self) -> Option<&ListenerError> {
        self.listener_error.as_ref()
    }

    pub fn endpoint(&self) -> Option<&SocketEndpoint> {
        self.endpoint.as_ref()
    }

    /// Sends one request line to the running listener and parses the reply.
    pub fn request(&self, line: &str) -> Value {
        let reply = match self.endpoint.as_ref().expect("endpoint configured") {
            #[cfg(unix)]
            SocketEndpoint::Unix { path } => {
                let stream = std::os::unix::net::UnixStream::connect(path.as_std_path())
                    .expect("connect unix socket");
                stream
                    .set_read_timeout(Some(READ_TIMEOUT))
                    .expect("set read timeout");
                exchange(stream, line)
            }
            _ => {
                let addr = self
                    .listener
                    .as_ref()
                    .and_then(ListenerHandle::local_addr)
                    .expect("listener bound to TCP");
                let stream = TcpStream::connect(addr).expect("connect tcp socket");
                stream
                    .set_read_timeout(Some(READ_TIMEOUT))
                    .expect("set read timeout");
                exchange(stream, line)
            }
        };
        serde_json::from_str(&reply).expect("response is JSON")
    }
}

fn exchange<S: Read + Write>(mut stream: S, line: &str) -> String {
    stream.write_all(line.as_bytes()).expect("write request");
    stream.write_all(b"\n").expect("write newline");
    stream.flush().expect("flush request");
    let mut reply = String::new();
    BufReader::new(stream)
        .read_line(&mut reply)
        .expect("read response");
    reply
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestWorld {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.take() {
            let _ = handle.stop();
        }
    }
}

/// Default test world fixture.
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
