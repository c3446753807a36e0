//! Errors reported by ledger implementations.

use thiserror::Error;

/// Failures surfaced by [`crate::Ledger`] calls and result iterators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The key is not acceptable to the ledger (for example, empty).
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// Offending key.
        key: String,
        /// Why the key was refused.
        reason: String,
    },

    /// The selector query could not be parsed or compiled.
    #[error("invalid query: {message}")]
    Query {
        /// Parser or compiler diagnostic.
        message: String,
    },

    /// A result iterator was advanced past its end or after being closed.
    #[error("result iterator exhausted")]
    Exhausted,

    /// The ledger could not service the request.
    #[error("ledger unavailable: {message}")]
    Unavailable {
        /// Description of the underlying failure.
        message: String,
    },
}

impl LedgerError {
    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
