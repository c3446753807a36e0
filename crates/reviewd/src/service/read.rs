//! `read`: fetch the stored bytes of one document.

use review_ledger::Ledger;
use tracing::debug;

use crate::envelope::{Response, Status};

use super::SERVICE_TARGET;
use super::arguments::ReadArgs;
use super::errors::ServiceError;

pub(super) const NOT_FOUND_MESSAGE: &str = "Not Found";

/// Returns the raw stored bytes. Lookup errors and empty values both read as
/// a missing document.
pub(super) fn read<L>(ledger: &L, args: ReadArgs) -> Result<Response, ServiceError>
where
    L: Ledger + ?Sized,
{
    match ledger.get_state(&args.id) {
        Ok(Some(value)) if !value.is_empty() => {
            Ok(Response::success(Status::Ok, super::OK_MESSAGE, Some(value)))
        }
        Ok(_) => Err(ServiceError::not_found(NOT_FOUND_MESSAGE)),
        Err(error) => {
            debug!(target: SERVICE_TARGET, id = %args.id, %error, "lookup failed");
            Err(ServiceError::not_found(NOT_FOUND_MESSAGE))
        }
    }
}
