//! Outcome envelope returned for every invocation.

use tracing::{error, warn};

/// Largest payload a successful response may carry.
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Message used when a success payload breaches [`MAX_PAYLOAD_BYTES`].
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Maximum return payload length of 1MB exceeded!";

const RESPONSE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::service");

/// Status codes mirroring HTTP semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200.
    Ok,
    /// 201.
    Created,
    /// 400.
    BadRequest,
    /// 404.
    NotFound,
    /// 409.
    Conflict,
    /// 500.
    Internal,
    /// 501.
    NotImplemented,
}

impl Status {
    /// Numeric code carried on the wire.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
            Self::NotImplemented => 501,
        }
    }

    /// Whether the status reports success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created)
    }
}

/// The `(status, message, payload)` triple handed back to callers.
///
/// Fields are private so every response passes through [`Response::success`]
/// or [`Response::error`], which enforce the payload cap and error logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    message: String,
    payload: Option<Vec<u8>>,
}

impl Response {
    /// Builds a success response.
    ///
    /// A payload larger than [`MAX_PAYLOAD_BYTES`] is replaced by a 500
    /// response without a payload.
    #[must_use]
    pub fn success(status: Status, message: impl Into<String>, payload: Option<Vec<u8>>) -> Self {
        if let Some(size) = payload.as_ref().map(Vec::len)
            && size > MAX_PAYLOAD_BYTES
        {
            warn!(
                target: RESPONSE_TARGET,
                size,
                limit = MAX_PAYLOAD_BYTES,
                "discarding oversized payload"
            );
            return Self::error(Status::Internal, PAYLOAD_TOO_LARGE_MESSAGE);
        }
        Self {
            status,
            message: message.into(),
            payload,
        }
    }

    /// Builds an error response, logging its code and message.
    #[must_use]
    pub fn error(status: Status, message: impl Into<String>) -> Self {
        let message = message.into();
        error!(
            target: RESPONSE_TARGET,
            status = status.code(),
            message = %message,
            "invocation failed"
        );
        Self {
            status,
            message,
            payload: None,
        }
    }

    /// Status of the outcome.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Payload bytes, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}
