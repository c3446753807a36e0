//! Key-value ledger contract consumed by the review document service.
//!
//! The service never owns persisted bytes. It talks to a transactional ledger
//! through three calls: a point lookup, a point write, and a declarative
//! selector query that streams matching records back through a
//! [`ResultsIterator`]. This crate defines that contract, the typed selector
//! tree used to build queries without string concatenation, and
//! [`MemoryLedger`], an in-process implementation used by the daemon and the
//! test suites.

mod error;
mod ledger;
mod memory;
mod selector;

pub use error::LedgerError;
pub use ledger::{KeyValue, Ledger, ResultsIterator};
pub use memory::{LedgerOperation, MemoryLedger};
pub use selector::{Condition, SelectorQuery};
