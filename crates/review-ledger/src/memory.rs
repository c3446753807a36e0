//! In-process ledger backed by an ordered map.
//!
//! [`MemoryLedger`] evaluates selector queries itself, so it stands in for an
//! external document store in the daemon and the test suites. Keys iterate in
//! lexicographic order, which keeps query results deterministic.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{Condition, KeyValue, Ledger, LedgerError, ResultsIterator, SelectorQuery};

const LEDGER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::memory");

/// Ledger calls that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOperation {
    /// [`Ledger::get_state`].
    Get,
    /// [`Ledger::put_state`].
    Put,
    /// [`Ledger::get_query_result`].
    Query,
}

/// Thread-safe in-memory ledger.
///
/// Clones share the same records, so a test can keep a handle while the
/// service under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    records: Mutex<BTreeMap<String, Vec<u8>>>,
    faults: Mutex<Vec<(LedgerOperation, String)>>,
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arranges for the next call of `operation` to fail with `message`.
    ///
    /// Faults queue up per operation and are consumed in order.
    pub fn fail_next(&self, operation: LedgerOperation, message: impl Into<String>) {
        if let Ok(mut faults) = self.inner.faults.lock() {
            faults.push((operation, message.into()));
        }
    }

    /// Number of query cursors handed out and not yet closed.
    #[must_use]
    pub fn open_iterators(&self) -> usize {
        self.inner.open_iterators.load(Ordering::SeqCst)
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().map(|records| records.len()).unwrap_or(0)
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>, LedgerError> {
        self.inner
            .records
            .lock()
            .map_err(|_| LedgerError::unavailable("ledger lock poisoned"))
    }

    fn check_fault(&self, operation: LedgerOperation) -> Result<(), LedgerError> {
        let mut faults = self
            .inner
            .faults
            .lock()
            .map_err(|_| LedgerError::unavailable("fault lock poisoned"))?;
        match faults.iter().position(|(op, _)| *op == operation) {
            Some(index) => {
                let (_, message) = faults.remove(index);
                Err(LedgerError::unavailable(message))
            }
            None => Ok(()),
        }
    }
}

impl Ledger for MemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.check_fault(LedgerOperation::Get)?;
        Ok(self.records()?.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.check_fault(LedgerOperation::Put)?;
        if key.is_empty() {
            return Err(LedgerError::invalid_key(key, "key must not be empty"));
        }
        self.records()?.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn get_query_result(&self, query: &str) -> Result<Box<dyn ResultsIterator>, LedgerError> {
        self.check_fault(LedgerOperation::Query)?;
        let query = SelectorQuery::parse(query)?;
        let matcher = CompiledSelector::compile(&query)?;

        let records = self.records()?;
        let mut matches = VecDeque::new();
        for (key, value) in records.iter() {
            if query.limit.is_some_and(|limit| matches.len() >= limit) {
                break;
            }
            let Ok(Value::Object(document)) = serde_json::from_slice::<Value>(value) else {
                continue;
            };
            if !matcher.matches(&document) {
                continue;
            }
            let projected = project(&document, &query.fields, value)?;
            matches.push_back(KeyValue::new(key.clone(), projected));
        }
        drop(records);

        debug!(
            target: LEDGER_TARGET,
            matches = matches.len(),
            "selector query evaluated"
        );

        self.inner.open_iterators.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryResultsIterator {
            records: matches,
            open_iterators: Arc::clone(&self.inner.open_iterators),
            closed: false,
        }))
    }
}

/// Selector conditions with regular expressions compiled up front.
struct CompiledSelector<'a> {
    conditions: Vec<(&'a str, CompiledCondition<'a>)>,
}

enum CompiledCondition<'a> {
    Regex(Regex),
    Eq(&'a Value),
}

impl<'a> CompiledSelector<'a> {
    fn compile(query: &'a SelectorQuery) -> Result<Self, LedgerError> {
        let conditions = query
            .selector
            .iter()
            .map(|(field, condition)| -> Result<_, LedgerError> {
                let compiled = match condition {
                    Condition::Regex(pattern) => {
                        CompiledCondition::Regex(Regex::new(pattern).map_err(|error| {
                            LedgerError::query(format!(
                                "invalid $regex for field '{field}': {error}"
                            ))
                        })?)
                    }
                    Condition::Eq(value) => CompiledCondition::Eq(value),
                };
                Ok((field.as_str(), compiled))
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;
        Ok(Self { conditions })
    }

    fn matches(&self, document: &Map<String, Value>) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| match (condition, document.get(*field)) {
                (CompiledCondition::Regex(regex), Some(Value::String(text))) => {
                    regex.is_match(text)
                }
                (CompiledCondition::Regex(_), _) => false,
                (CompiledCondition::Eq(expected), actual) => actual == Some(*expected),
            })
    }
}

fn project(
    document: &Map<String, Value>,
    fields: &[String],
    original: &[u8],
) -> Result<Vec<u8>, LedgerError> {
    if fields.is_empty() {
        return Ok(original.to_vec());
    }
    let projected: Map<String, Value> = fields
        .iter()
        .filter_map(|field| {
            document
                .get(field)
                .map(|value| (field.clone(), value.clone()))
        })
        .collect();
    serde_json::to_vec(&Value::Object(projected))
        .map_err(|error| LedgerError::unavailable(error.to_string()))
}

/// Cursor over a materialised result set.
struct MemoryResultsIterator {
    records: VecDeque<KeyValue>,
    open_iterators: Arc<AtomicUsize>,
    closed: bool,
}

impl ResultsIterator for MemoryResultsIterator {
    fn has_next(&self) -> bool {
        !self.closed && !self.records.is_empty()
    }

    fn next(&mut self) -> Result<KeyValue, LedgerError> {
        if self.closed {
            return Err(LedgerError::Exhausted);
        }
        self.records.pop_front().ok_or(LedgerError::Exhausted)
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.closed {
            self.closed = true;
            self.records.clear();
            self.open_iterators.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
