//! Listener failures.

use std::io;
use std::net::SocketAddr;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced while binding or running the socket listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The TCP host name did not resolve.
    #[error("failed to resolve TCP address {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    /// The TCP host name resolved to nothing.
    #[error("no TCP addresses resolved for {host}:{port}")]
    ResolveEmpty { host: String, port: u16 },
    /// Binding the TCP socket failed.
    #[error("failed to bind TCP listener at {addr}: {source}")]
    BindTcp {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The listener could not be switched to non-blocking mode.
    #[error("failed to enable non-blocking listener: {source}")]
    NonBlocking {
        #[source]
        source: io::Error,
    },
    /// Unix sockets are not available on this platform.
    #[error("unix sockets are unsupported for endpoint {endpoint}")]
    UnsupportedUnix { endpoint: String },
    /// Binding the Unix socket failed.
    #[error("failed to bind unix listener at {path}: {source}")]
    BindUnix {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// Another process is accepting on the socket path.
    #[error("existing unix socket {path} is already in use")]
    UnixInUse { path: Utf8PathBuf },
    /// Something other than a socket occupies the path.
    #[error("unix socket path {path} is not a socket")]
    UnixNotSocket { path: Utf8PathBuf },
    /// Probing the existing socket path failed.
    #[error("failed to inspect existing unix socket {path}: {source}")]
    UnixProbe {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// A stale socket file could not be removed.
    #[error("failed to remove stale unix socket {path}: {source}")]
    UnixCleanup {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// The accept loop thread panicked.
    #[error("listener thread panicked")]
    ThreadPanic,
}
