//! Operation names and their parsed invocations.

use std::fmt;

use super::arguments::{CreateArgs, ReadArgs, SearchArgs};
use super::errors::ServiceError;
use super::options::FieldLimits;

/// Rejection text for unknown operation names.
///
/// Lists the nominal method set, which is wider than the operations routed
/// here.
pub const INVALID_METHOD_MESSAGE: &str =
    "Invalid method! Valid methods are 'create|update|delete|exist|read|history|search'!";

/// Supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Store a new document.
    Create,
    /// Fetch a document by id.
    Read,
    /// Match documents by a pattern on `text`.
    Search,
}

impl Operation {
    /// Every routed operation.
    pub const ALL: [Self; 3] = [Self::Create, Self::Read, Self::Search];

    /// Resolves an operation name. Matching is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotImplemented`] for any other name.
    pub fn parse(name: &str) -> Result<Self, ServiceError> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.as_str() == name)
            .ok_or_else(|| ServiceError::not_implemented(INVALID_METHOD_MESSAGE))
    }

    /// Wire name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A validated invocation ready to run against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `create` with its parsed arguments.
    Create(CreateArgs),
    /// `read` with its parsed arguments.
    Read(ReadArgs),
    /// `search` with its parsed arguments.
    Search(SearchArgs),
}

impl Invocation {
    /// Resolves `name` and parses `arguments` for it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotImplemented`] for unknown names and
    /// [`ServiceError::BadRequest`] for invalid arguments.
    pub fn parse(
        name: &str,
        arguments: &[String],
        limits: Option<&FieldLimits>,
    ) -> Result<Self, ServiceError> {
        Ok(match Operation::parse(name)? {
            Operation::Create => Self::Create(CreateArgs::parse(arguments, limits)?),
            Operation::Read => Self::Read(ReadArgs::parse(arguments, limits)?),
            Operation::Search => Self::Search(SearchArgs::parse(arguments, limits)?),
        })
    }

    /// Operation this invocation runs.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::Create(_) => Operation::Create,
            Self::Read(_) => Operation::Read,
            Self::Search(_) => Operation::Search,
        }
    }
}
