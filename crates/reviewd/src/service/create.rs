//! `create`: store a document under a fresh key.

use review_ledger::Ledger;
use tracing::{debug, warn};

use crate::envelope::{Response, Status};

use super::SERVICE_TARGET;
use super::arguments::CreateArgs;
use super::errors::ServiceError;

pub(super) const CREATED_MESSAGE: &str = "Text Created";
pub(super) const EXISTS_MESSAGE: &str = "Text Exists";

/// Writes the document unless its key is already taken.
///
/// Only an empty, error-free probe counts as "absent". A failed probe is
/// reported as a conflict rather than risking an overwrite.
pub(super) fn create<L>(ledger: &L, args: CreateArgs) -> Result<Response, ServiceError>
where
    L: Ledger + ?Sized,
{
    match ledger.get_state(&args.id) {
        Ok(None) => {}
        Ok(Some(_)) => return Err(ServiceError::conflict(EXISTS_MESSAGE)),
        Err(error) => {
            warn!(
                target: SERVICE_TARGET,
                id = %args.id,
                %error,
                "existence probe failed; treating key as taken"
            );
            return Err(ServiceError::conflict(EXISTS_MESSAGE));
        }
    }

    let encoded = args
        .document
        .encode()
        .map_err(|error| ServiceError::internal(error.to_string()))?;
    ledger
        .put_state(&args.id, &encoded)
        .map_err(|error| ServiceError::internal(error.to_string()))?;

    debug!(target: SERVICE_TARGET, id = %args.id, "document stored");
    Ok(Response::success(Status::Created, CREATED_MESSAGE, None))
}
