//! Layered configuration for the review document daemon.
//!
//! Values resolve from built-in defaults, then a `reviewd.toml` configuration
//! file, then `REVIEWD_*` environment variables, then command-line flags, with
//! later layers winning. Loading is delegated to [`ortho_config`].

mod defaults;
mod logging;
mod policy;
mod socket;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_MAX_ID_LENGTH, DEFAULT_MAX_PATTERN_LENGTH,
    DEFAULT_MAX_TEXT_LENGTH, DEFAULT_TCP_PORT, default_corrupt_record_policy,
    default_limit_mode, default_log_filter, default_log_filter_string, default_log_format,
    default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use policy::{CorruptRecordPolicy, LimitMode};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "REVIEWD")]
pub struct Config {
    /// Socket the daemon accepts invocations on.
    #[ortho_config(default = default_socket_endpoint())]
    pub listen_socket: SocketEndpoint,
    /// `tracing` filter directive, e.g. `info` or `reviewd=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log events.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Whether argument length limits are enforced.
    #[ortho_config(default = default_limit_mode())]
    pub field_limits: LimitMode,
    /// Longest accepted document id when limits are enforced.
    #[ortho_config(default = DEFAULT_MAX_ID_LENGTH)]
    pub max_id_length: usize,
    /// Longest accepted `text` field when limits are enforced.
    #[ortho_config(default = DEFAULT_MAX_TEXT_LENGTH)]
    pub max_text_length: usize,
    /// Longest accepted search pattern when limits are enforced.
    #[ortho_config(default = DEFAULT_MAX_PATTERN_LENGTH)]
    pub max_pattern_length: usize,
    /// Treatment of stored records that fail to decode during a search.
    #[ortho_config(default = default_corrupt_record_policy())]
    pub corrupt_records: CorruptRecordPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_socket: default_socket_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            field_limits: default_limit_mode(),
            max_id_length: DEFAULT_MAX_ID_LENGTH,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
            corrupt_records: default_corrupt_record_policy(),
        }
    }
}

impl Config {
    /// Socket the daemon listens on.
    #[must_use]
    pub fn listen_socket(&self) -> &SocketEndpoint {
        &self.listen_socket
    }

    /// Log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Argument limit mode.
    #[must_use]
    pub fn field_limits(&self) -> LimitMode {
        self.field_limits
    }

    /// Policy for undecodable records.
    #[must_use]
    pub fn corrupt_records(&self) -> CorruptRecordPolicy {
        self.corrupt_records
    }
}
