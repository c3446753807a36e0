//! `search`: regular-expression match on the `text` field.

use review_config::CorruptRecordPolicy;
use review_ledger::Ledger;
use tracing::{debug, warn};

use crate::document::{DecodedDocument, Document};
use crate::envelope::{Response, Status};

use super::SERVICE_TARGET;
use super::arguments::SearchArgs;
use super::errors::ServiceError;
use super::query::{QueryResults, SearchHit, SearchResults, build_search_query};

/// Runs the selector query and aggregates every hit into `{"values":[...]}`.
///
/// The ledger cursor is released when `results` goes out of scope, whichever
/// way this function returns.
pub(super) fn search<L>(
    ledger: &L,
    args: SearchArgs,
    policy: CorruptRecordPolicy,
) -> Result<Response, ServiceError>
where
    L: Ledger + ?Sized,
{
    let query = build_search_query(&args.pattern);
    let mut results = QueryResults::open(ledger, &query).map_err(internal)?;

    let mut values = Vec::new();
    while results.has_next() {
        let record = results.next_record().map_err(internal)?;
        let document = decode_record(&record.key, &record.value, policy)?;
        values.push(SearchHit::new(record.key, document));
    }
    drop(results);

    debug!(target: SERVICE_TARGET, hits = values.len(), "search complete");
    let payload = serde_json::to_vec(&SearchResults { values })
        .map_err(|error| ServiceError::internal(error.to_string()))?;
    Ok(Response::success(Status::Ok, super::OK_MESSAGE, Some(payload)))
}

fn decode_record(
    key: &str,
    value: &[u8],
    policy: CorruptRecordPolicy,
) -> Result<Document, ServiceError> {
    match Document::decode(value) {
        DecodedDocument::Valid(document) => Ok(document),
        DecodedDocument::Corrupt(corrupt) => match policy {
            CorruptRecordPolicy::Tolerate => {
                warn!(
                    target: SERVICE_TARGET,
                    key,
                    reason = corrupt.reason(),
                    "salvaging undecodable record"
                );
                Ok(corrupt.salvage())
            }
            CorruptRecordPolicy::Reject => Err(ServiceError::internal(format!(
                "record '{key}' could not be decoded: {}",
                corrupt.reason()
            ))),
        },
    }
}

fn internal(error: review_ledger::LedgerError) -> ServiceError {
    ServiceError::internal(error.to_string())
}
