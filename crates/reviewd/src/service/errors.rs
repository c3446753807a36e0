//! Failure kinds produced by the operation handlers.

use thiserror::Error;

use crate::envelope::{Response, Status};

/// Terminal failure of a single invocation.
///
/// Every variant maps to one envelope status; the display text becomes the
/// envelope message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The invocation was malformed (wrong arity, limit violation).
    #[error("{message}")]
    BadRequest { message: String },

    /// No record exists under the requested key.
    #[error("{message}")]
    NotFound { message: String },

    /// A record already exists under the key being created.
    #[error("{message}")]
    Conflict { message: String },

    /// The ledger failed or a response could not be assembled.
    #[error("{message}")]
    Internal { message: String },

    /// The operation name is not part of the supported set.
    #[error("{message}")]
    NotImplemented { message: String },
}

impl ServiceError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a not implemented error.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    /// Envelope status for this failure.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::BadRequest { .. } => Status::BadRequest,
            Self::NotFound { .. } => Status::NotFound,
            Self::Conflict { .. } => Status::Conflict,
            Self::Internal { .. } => Status::Internal,
            Self::NotImplemented { .. } => Status::NotImplemented,
        }
    }

    /// Converts the failure into its (logged) error envelope.
    #[must_use]
    pub fn into_response(self) -> Response {
        let status = self.status();
        Response::error(status, self.to_string())
    }
}
