//! Typed selector queries.
//!
//! Queries are assembled as data and serialized through `serde_json`, so user
//! supplied patterns travel as escaped JSON strings and can never terminate
//! the surrounding literal.
//!
//! ```json
//! {"selector":{"text":{"$regex":"^Wid"}},"fields":["text","review"],"limit":99}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::LedgerError;

/// Match condition applied to a single document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// The field is a string containing a match for the regular expression.
    #[serde(rename = "$regex")]
    Regex(String),
    /// The field equals the given JSON value.
    #[serde(rename = "$eq")]
    Eq(Value),
}

/// A declarative multi-field query with projection and result cap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectorQuery {
    /// Conditions keyed by field name; all must hold for a document to match.
    pub selector: BTreeMap<String, Condition>,
    /// Fields to keep in matched documents. Empty keeps whole documents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Maximum number of results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SelectorQuery {
    /// Creates an empty query that matches every JSON document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `field` to match the regular expression `pattern`.
    #[must_use]
    pub fn regex(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.selector
            .insert(field.into(), Condition::Regex(pattern.into()));
        self
    }

    /// Requires `field` to equal `value`.
    #[must_use]
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.selector
            .insert(field.into(), Condition::Eq(value.into()));
        self
    }

    /// Projects matched documents down to `fields`.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Serializes the query to its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Query`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        serde_json::to_string(self).map_err(|error| LedgerError::query(error.to_string()))
    }

    /// Parses a query from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Query`] if the text is not a valid selector
    /// query.
    pub fn parse(query: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(query).map_err(|error| LedgerError::query(error.to_string()))
    }
}
