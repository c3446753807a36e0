//! Review document schema and its JSON byte encoding.
//!
//! A [`Document`] has no identity of its own; it is stored under an external
//! key. Decoding never fails outright. Undecodable bytes come back as
//! [`DecodedDocument::Corrupt`] so each caller decides whether to salvage or
//! reject the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The five-field record persisted per key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Free text the search operation matches against.
    pub text: String,
    /// Review body.
    pub review: String,
    /// Reviewer name.
    pub name: String,
    /// Reviewer location.
    pub location: String,
    /// Rating, kept as opaque text.
    pub rating: String,
}

/// Failure to encode a [`Document`].
#[derive(Debug, Error)]
#[error("failed to encode document: {0}")]
pub struct DocumentError(#[from] serde_json::Error);

impl Document {
    /// Builds a document from its fields.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        review: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        rating: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            review: review.into(),
            name: name.into(),
            location: location.into(),
            rating: rating.into(),
        }
    }

    /// Serialises the document to its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes stored bytes.
    ///
    /// Missing fields default to empty strings and unknown fields are
    /// ignored, so only bytes that are not a JSON object of string fields
    /// count as corrupt.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> DecodedDocument {
        match serde_json::from_slice::<Self>(bytes) {
            Ok(document) => DecodedDocument::Valid(document),
            Err(error) => DecodedDocument::Corrupt(CorruptDocument {
                raw: bytes.to_vec(),
                reason: error.to_string(),
            }),
        }
    }
}

/// Outcome of decoding one stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedDocument {
    /// The bytes decoded cleanly.
    Valid(Document),
    /// The bytes could not be decoded as a document.
    Corrupt(CorruptDocument),
}

/// Stored bytes that failed to decode, kept with the decoder's diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptDocument {
    raw: Vec<u8>,
    reason: String,
}

impl CorruptDocument {
    /// The undecodable bytes as stored.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Decoder diagnostic.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Recovers whatever string fields can still be read.
    ///
    /// Fields holding non-string values, and every field of a value that is
    /// not a JSON object, come back empty.
    #[must_use]
    pub fn salvage(&self) -> Document {
        let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(&self.raw) else {
            return Document::default();
        };
        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_default()
        };
        Document {
            text: field("text"),
            review: field("review"),
            name: field("name"),
            location: field("location"),
            rating: field("rating"),
        }
    }
}
