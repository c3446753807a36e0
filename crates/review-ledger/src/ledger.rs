//! The ledger trait and its streaming query results.

use crate::LedgerError;

/// A single record yielded by a selector query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Key the record is stored under.
    pub key: String,
    /// Stored (possibly projected) value bytes.
    pub value: Vec<u8>,
}

impl KeyValue {
    /// Builds a record from its parts.
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Forward-only cursor over selector query results.
///
/// Holders must call [`ResultsIterator::close`] once they are done, whatever
/// the outcome of the consumption. Implementations treat repeated closes as a
/// no-op.
pub trait ResultsIterator: Send {
    /// Returns `true` while another record is available.
    fn has_next(&self) -> bool;

    /// Yields the next record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Exhausted`] when called without a pending record,
    /// or an implementation-specific error if the record cannot be read.
    fn next(&mut self) -> Result<KeyValue, LedgerError>;

    /// Releases the resources held by the cursor.
    ///
    /// # Errors
    ///
    /// Returns an implementation-specific error if the release fails.
    fn close(&mut self) -> Result<(), LedgerError>;
}

/// Transactional key-value store exposing point and selector access.
pub trait Ledger: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the ledger cannot answer the lookup.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the key is refused or the write fails.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Runs a JSON selector query and returns a cursor over the matches.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Query`] for malformed queries and other errors
    /// when the ledger cannot run the query.
    fn get_query_result(&self, query: &str) -> Result<Box<dyn ResultsIterator>, LedgerError>;
}

impl<L> Ledger for std::sync::Arc<L>
where
    L: Ledger + ?Sized,
{
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put_state(key, value)
    }

    fn get_query_result(&self, query: &str) -> Result<Box<dyn ResultsIterator>, LedgerError> {
        (**self).get_query_result(query)
    }
}
