//! Review document daemon.
//!
//! The daemon stores five-field review documents in a key-value ledger and
//! exposes three operations over a JSONL socket protocol: `create` a document
//! under a fresh, case-insensitive id, `read` it back, and `search` documents
//! whose `text` matches a regular expression.
//!
//! The core is [`ReviewService`], which validates an `(operation, arguments)`
//! pair, talks to the [`review_ledger::Ledger`] and returns a [`Response`]
//! envelope. Everything around it follows the bootstrap sequence: load
//! configuration through [`review_config`], install telemetry, prepare the
//! socket, then serve until a shutdown signal arrives. Each stage is reported
//! through a [`HealthReporter`].

mod bootstrap;
pub mod dispatch;
mod document;
mod envelope;
mod health;
mod process;
pub mod service;
pub mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use document::{CorruptDocument, DecodedDocument, Document, DocumentError};
pub use envelope::{MAX_PAYLOAD_BYTES, PAYLOAD_TOO_LARGE_MESSAGE, Response, Status};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, run_daemon};
pub use service::{ReviewService, ServiceError, ServiceOptions};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{ListenerError, ListenerHandle};

#[cfg(test)]
mod tests;
