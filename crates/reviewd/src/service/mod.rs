//! Review document operations.
//!
//! [`ReviewService`] owns a ledger handle and turns `(operation, arguments)`
//! pairs into [`Response`] envelopes. Names are resolved to a tagged
//! [`Invocation`] first, so an unknown name or a malformed argument list
//! never touches the ledger.
//!
//! | Operation | Arguments | Success |
//! |---|---|---|
//! | `create` | id, text, review, name, location, rating | 201, no payload |
//! | `read` | id | 200, stored document bytes |
//! | `search` | pattern | 200, `{"values":[...]}` |

mod arguments;
mod create;
mod errors;
mod operation;
mod options;
mod query;
mod read;
mod search;
#[cfg(test)]
mod tests;

use review_ledger::Ledger;
use tracing::{debug, info_span, warn};

use crate::envelope::{Response, Status};

pub use self::arguments::{CreateArgs, ReadArgs, SearchArgs, normalize_id};
pub use self::errors::ServiceError;
pub use self::operation::{INVALID_METHOD_MESSAGE, Invocation, Operation};
pub use self::options::{FieldLimits, ServiceOptions};
pub use self::query::{
    PROJECTED_FIELDS, SEARCH_FIELD, SEARCH_RESULT_LIMIT, SearchHit, SearchResults,
    build_search_query,
};

pub(crate) const SERVICE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::service");

const OK_MESSAGE: &str = "OK";

/// Stateless request handler over a ledger.
#[derive(Debug, Clone)]
pub struct ReviewService<L> {
    ledger: L,
    options: ServiceOptions,
}

impl<L> ReviewService<L>
where
    L: Ledger,
{
    /// Creates a service over `ledger`.
    pub fn new(ledger: L, options: ServiceOptions) -> Self {
        Self { ledger, options }
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Active validation options.
    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// Initialisation entry point. Accepts no arguments.
    pub fn init(&self, arguments: &[String]) -> Response {
        if arguments.is_empty() {
            Response::success(Status::Ok, OK_MESSAGE, None)
        } else {
            ServiceError::bad_request(format!(
                "init accepts no arguments, got {}",
                arguments.len()
            ))
            .into_response()
        }
    }

    /// Runs the named operation.
    ///
    /// Every failure is converted into its error envelope, which is logged
    /// with its status code and message.
    pub fn invoke(&self, operation: &str, arguments: &[String]) -> Response {
        let span = info_span!(target: SERVICE_TARGET, "invoke", operation);
        let _entered = span.enter();

        match self.dispatch(operation, arguments) {
            Ok(response) => {
                debug!(
                    target: SERVICE_TARGET,
                    status = response.status().code(),
                    "invocation succeeded"
                );
                response
            }
            Err(error) => error.into_response(),
        }
    }

    fn dispatch(&self, operation: &str, arguments: &[String]) -> Result<Response, ServiceError> {
        let invocation = Invocation::parse(operation, arguments, self.options.limits.as_ref())
            .inspect_err(|error| {
                if matches!(error, ServiceError::NotImplemented { .. }) {
                    warn!(target: SERVICE_TARGET, operation, "unknown operation");
                }
            })?;
        self.execute(invocation)
    }

    /// Runs an already validated invocation.
    ///
    /// # Errors
    ///
    /// Returns the [`ServiceError`] the handler produced.
    pub fn execute(&self, invocation: Invocation) -> Result<Response, ServiceError> {
        match invocation {
            Invocation::Create(args) => create::create(&self.ledger, args),
            Invocation::Read(args) => read::read(&self.ledger, args),
            Invocation::Search(args) => {
                search::search(&self.ledger, args, self.options.corrupt_records)
            }
        }
    }
}
