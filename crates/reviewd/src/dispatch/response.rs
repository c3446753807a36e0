//! Response line serialisation.

use std::io::Write;

use serde::Serialize;

use crate::envelope::Response;

use super::errors::DispatchError;

/// Wire form of a [`Response`]. Payload bytes are rendered as UTF-8, with
/// invalid sequences replaced.
#[derive(Debug, Serialize)]
struct WireResponse<'a> {
    status: u16,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
}

impl<'a> From<&'a Response> for WireResponse<'a> {
    fn from(response: &'a Response) -> Self {
        Self {
            status: response.status().code(),
            message: response.message(),
            payload: response
                .payload()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Writes envelopes as single JSONL lines.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps an output stream.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `response` followed by a newline and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation, writing or flushing fails.
    pub fn write_response(&mut self, response: &Response) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut self.writer, &WireResponse::from(response))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes the error envelope for a dispatch failure.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_error(&mut self, error: &DispatchError) -> Result<(), DispatchError> {
        self.write_response(&error.to_response())
    }
}
