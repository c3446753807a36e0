//! Failures reading, parsing or answering a request line.

use std::io;

use thiserror::Error;

use crate::envelope::{Response, Status};

/// Errors raised outside the review operations themselves.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request line was empty or not a valid request object.
    #[error("malformed request: {message}")]
    MalformedJsonl {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The request line exceeded the size limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge { size: usize, max_size: usize },

    /// Reading from or writing to the connection failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The response could not be serialised.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[from] serde_json::Error),
}

impl DispatchError {
    /// Envelope status reported to the client.
    ///
    /// Protocol violations are the client's fault (400); transport and
    /// serialisation failures are ours (500).
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::MalformedJsonl { .. } | Self::RequestTooLarge { .. } => Status::BadRequest,
            Self::Io(_) | Self::SerializeResponse(_) => Status::Internal,
        }
    }

    /// Converts the failure into its (logged) error envelope.
    #[must_use]
    pub fn to_response(&self) -> Response {
        Response::error(self.status(), self.to_string())
    }

    /// Creates a malformed request error from a serde error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedJsonl {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed request error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJsonl {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a request too large error.
    pub fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }
}
