//! Search query construction and result streaming.
//!
//! The selector is built as a typed [`SelectorQuery`] and serialised by
//! `serde_json`, so the user's pattern is always a properly escaped string
//! literal. Results come back through [`QueryResults`], which closes the
//! ledger iterator when dropped.

use review_ledger::{KeyValue, Ledger, LedgerError, ResultsIterator, SelectorQuery};
use serde::Serialize;
use tracing::warn;

use crate::document::Document;

use super::SERVICE_TARGET;

/// Field the search pattern is matched against.
pub const SEARCH_FIELD: &str = "text";

/// Fields projected from every matching record.
pub const PROJECTED_FIELDS: [&str; 5] = ["text", "review", "name", "location", "rating"];

/// Upper bound on the number of records one search returns.
pub const SEARCH_RESULT_LIMIT: usize = 99;

/// Builds the selector query for a `search` pattern.
#[must_use]
pub fn build_search_query(pattern: &str) -> SelectorQuery {
    SelectorQuery::new()
        .regex(SEARCH_FIELD, pattern)
        .fields(PROJECTED_FIELDS)
        .limit(SEARCH_RESULT_LIMIT)
}

/// Open ledger cursor that is closed on every exit path.
pub(crate) struct QueryResults {
    inner: Box<dyn ResultsIterator>,
}

impl QueryResults {
    /// Serialises `query` and submits it to `ledger`.
    pub(crate) fn open<L>(ledger: &L, query: &SelectorQuery) -> Result<Self, LedgerError>
    where
        L: Ledger + ?Sized,
    {
        let query = query.to_json()?;
        let inner = ledger.get_query_result(&query)?;
        Ok(Self { inner })
    }

    pub(crate) fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    pub(crate) fn next_record(&mut self) -> Result<KeyValue, LedgerError> {
        self.inner.next()
    }
}

impl Drop for QueryResults {
    fn drop(&mut self) {
        if let Err(error) = self.inner.close() {
            warn!(
                target: SERVICE_TARGET,
                %error,
                "failed to close query results"
            );
        }
    }
}

/// One entry of the search aggregate. The document's `text` is reported as
/// `product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Key the record is stored under.
    pub id: String,
    /// Review body.
    pub review: String,
    /// The document's `text` field.
    pub product: String,
    /// Reviewer name.
    pub name: String,
    /// Reviewer location.
    pub location: String,
    /// Rating.
    pub rating: String,
}

impl SearchHit {
    /// Pairs a stored key with its decoded document.
    #[must_use]
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        let Document {
            text,
            review,
            name,
            location,
            rating,
        } = document;
        Self {
            id: id.into(),
            review,
            product: text,
            name,
            location,
            rating,
        }
    }
}

/// Payload of a successful search: `{"values":[...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Hits in ledger iteration order.
    pub values: Vec<SearchHit>,
}
