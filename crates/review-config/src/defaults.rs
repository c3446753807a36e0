#[cfg(unix)]
use std::env;

#[cfg(unix)]
use camino::Utf8PathBuf;
#[cfg(unix)]
use dirs::runtime_dir;
#[cfg(unix)]
use libc::geteuid;

use crate::logging::LogFormat;
use crate::policy::{CorruptRecordPolicy, LimitMode};
use crate::socket::SocketEndpoint;

/// Default TCP port used when Unix domain sockets are not available.
pub const DEFAULT_TCP_PORT: u16 = 9780;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default upper bound on document id length when limits are enforced.
pub const DEFAULT_MAX_ID_LENGTH: usize = 64;

/// Default upper bound on the `text` field length when limits are enforced.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 255;

/// Default upper bound on search pattern length when limits are enforced.
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 64;

/// Default log filter expression.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Argument limits are off unless configured.
#[must_use]
pub fn default_limit_mode() -> LimitMode {
    LimitMode::Off
}

/// Corrupt records are tolerated unless configured.
#[must_use]
pub fn default_corrupt_record_policy() -> CorruptRecordPolicy {
    CorruptRecordPolicy::Tolerate
}

/// Computes the default listening socket.
///
/// On Unix this is `reviewd/reviewd.sock` under the user's runtime directory,
/// or under a per-uid directory in the temp dir when no runtime directory is
/// available. Elsewhere it is a loopback TCP socket.
#[must_use]
pub fn default_socket_endpoint() -> SocketEndpoint {
    default_socket_endpoint_inner()
}

#[cfg(unix)]
fn default_socket_endpoint_inner() -> SocketEndpoint {
    let mut base = match runtime_dir().and_then(|path| Utf8PathBuf::from_path_buf(path).ok()) {
        Some(dir) => {
            let mut base = dir;
            base.push("reviewd");
            base
        }
        None => {
            let mut base = Utf8PathBuf::from_path_buf(env::temp_dir())
                .unwrap_or_else(|_| Utf8PathBuf::from("/tmp"));
            base.push("reviewd");
            base.push(user_namespace());
            base
        }
    };
    base.push("reviewd.sock");
    SocketEndpoint::unix(base)
}

#[cfg(unix)]
fn user_namespace() -> String {
    // SAFETY: `geteuid` has no preconditions and cannot fail.
    let uid = unsafe { geteuid() };
    format!("uid-{uid}")
}

#[cfg(not(unix))]
fn default_socket_endpoint_inner() -> SocketEndpoint {
    SocketEndpoint::tcp("127.0.0.1", DEFAULT_TCP_PORT)
}
