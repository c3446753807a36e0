//! Request line parsing.

use serde::Deserialize;

use super::errors::DispatchError;

/// One client request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationRequest {
    /// Initialisation call; succeeds only without arguments.
    Init {
        /// Positional arguments.
        #[serde(default)]
        arguments: Vec<String>,
    },
    /// Named operation call.
    Invoke {
        /// Operation name, matched exactly.
        operation: String,
        /// Positional arguments.
        #[serde(default)]
        arguments: Vec<String>,
    },
}

impl InvocationRequest {
    /// Parses a request line. Trailing whitespace, including the newline
    /// delimiter, is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedJsonl`] when the line is blank or
    /// does not describe a request.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = line.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request line"));
        }
        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)
    }

    /// Short label used in logs.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Init { .. } => "init",
            Self::Invoke { operation, .. } => operation,
        }
    }
}
