//! Accepted connection streams and the handler seam.

use std::io::{self, Read, Write};
use std::net::TcpStream;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

/// Stream types accepted by the listener.
pub(crate) enum ConnectionStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl ConnectionStream {
    fn as_read_write(&mut self) -> &mut dyn ReadWrite {
        match self {
            Self::Tcp(stream) => stream,
            #[cfg(unix)]
            Self::Unix(stream) => stream,
        }
    }
}

trait ReadWrite: Read + Write {}

impl<T: Read + Write> ReadWrite for T {}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.as_read_write().read(buf)
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.as_read_write().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.as_read_write().flush()
    }
}

/// Handles accepted connections. Implementations must not panic.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Serves a single connection to completion.
    fn handle(&self, stream: ConnectionStream);
}
