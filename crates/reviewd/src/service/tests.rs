//! Unit tests for the review operations.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mockall::mock;
use review_config::CorruptRecordPolicy;
use review_ledger::{KeyValue, Ledger, LedgerError, LedgerOperation, MemoryLedger, ResultsIterator};
use rstest::{fixture, rstest};

use crate::document::{DecodedDocument, Document};
use crate::envelope::{MAX_PAYLOAD_BYTES, PAYLOAD_TOO_LARGE_MESSAGE, Status};

use super::*;

mock! {
    pub Store {}
    impl Ledger for Store {
        fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;
        fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;
        fn get_query_result(&self, query: &str) -> Result<Box<dyn ResultsIterator>, LedgerError>;
    }
}

mock! {
    pub Cursor {}
    impl ResultsIterator for Cursor {
        fn has_next(&self) -> bool;
        fn next(&mut self) -> Result<KeyValue, LedgerError>;
        fn close(&mut self) -> Result<(), LedgerError>;
    }
}

/// Cursor that panics when advanced and records whether it was closed.
struct PanickingCursor {
    closed: Arc<AtomicBool>,
}

impl ResultsIterator for PanickingCursor {
    fn has_next(&self) -> bool {
        true
    }

    fn next(&mut self) -> Result<KeyValue, LedgerError> {
        panic!("cursor exploded");
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[fixture]
fn ledger() -> MemoryLedger {
    MemoryLedger::new()
}

#[fixture]
fn service(ledger: MemoryLedger) -> ReviewService<MemoryLedger> {
    ReviewService::new(ledger, ServiceOptions::default())
}

fn create_widget(service: &ReviewService<MemoryLedger>, id: &str) -> Response {
    service.invoke(
        "create",
        &args(&[id, "Widget", "Great!", "Alice", "NY", "5"]),
    )
}

fn payload_json(response: &Response) -> serde_json::Value {
    let payload = response.payload().expect("payload present");
    serde_json::from_slice(payload).expect("payload is JSON")
}

#[rstest]
fn create_read_search_round_trip(service: ReviewService<MemoryLedger>) {
    let created = create_widget(&service, "r1");
    assert_eq!(created.status(), Status::Created);
    assert_eq!(created.message(), "Text Created");
    assert!(created.payload().is_none());

    let read = service.invoke("read", &args(&["r1"]));
    assert_eq!(read.status(), Status::Ok);
    assert_eq!(read.message(), "OK");
    let stored = read.payload().expect("document bytes");
    assert_eq!(
        Document::decode(stored),
        DecodedDocument::Valid(Document::new("Widget", "Great!", "Alice", "NY", "5"))
    );

    let found = service.invoke("search", &args(&["^Wid"]));
    assert_eq!(found.status(), Status::Ok);
    assert_eq!(
        found.payload().expect("search payload"),
        br#"{"values":[{"id":"r1","review":"Great!","product":"Widget","name":"Alice","location":"NY","rating":"5"}]}"#
    );
}

#[rstest]
fn ids_fold_to_lowercase(service: ReviewService<MemoryLedger>) {
    assert_eq!(create_widget(&service, "AbC").status(), Status::Created);
    assert_eq!(service.invoke("read", &args(&["abc"])).status(), Status::Ok);
    assert_eq!(service.invoke("read", &args(&["ABC"])).status(), Status::Ok);
    assert_eq!(service.ledger().get_state("abc").map(|v| v.is_some()), Ok(true));
}

#[rstest]
fn sigma_final_ids_fold_per_character(service: ReviewService<MemoryLedger>) {
    assert_eq!(create_widget(&service, "ΟΔΟΣ").status(), Status::Created);
    assert_eq!(service.invoke("read", &args(&["οδοσ"])).status(), Status::Ok);
    assert_eq!(service.invoke("read", &args(&["ΟΔΟΣ"])).status(), Status::Ok);
    assert_eq!(
        create_widget(&service, "οδοσ").status(),
        Status::Conflict
    );
}

#[rstest]
fn duplicate_create_conflicts_and_keeps_the_original(service: ReviewService<MemoryLedger>) {
    create_widget(&service, "r1");
    let duplicate = service.invoke(
        "create",
        &args(&["R1", "Gadget", "Meh", "Bob", "LA", "2"]),
    );
    assert_eq!(duplicate.status(), Status::Conflict);
    assert_eq!(duplicate.message(), "Text Exists");

    let read = service.invoke("read", &args(&["r1"]));
    assert_eq!(payload_json(&read)["text"], "Widget");
}

#[rstest]
fn read_of_unknown_id_is_not_found(service: ReviewService<MemoryLedger>) {
    let response = service.invoke("read", &args(&["missing"]));
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(response.message(), "Not Found");
}

#[rstest]
fn read_treats_empty_values_as_missing(ledger: MemoryLedger) {
    ledger.put_state("blank", b"").expect("seed");
    let service = ReviewService::new(ledger, ServiceOptions::default());
    assert_eq!(
        service.invoke("read", &args(&["blank"])).status(),
        Status::NotFound
    );
}

#[rstest]
fn read_treats_lookup_errors_as_missing(ledger: MemoryLedger) {
    ledger.fail_next(LedgerOperation::Get, "disk on fire");
    let service = ReviewService::new(ledger, ServiceOptions::default());
    assert_eq!(
        service.invoke("read", &args(&["r1"])).status(),
        Status::NotFound
    );
}

#[rstest]
fn create_surfaces_write_failures(ledger: MemoryLedger) {
    ledger.fail_next(LedgerOperation::Put, "disk full");
    let service = ReviewService::new(ledger.clone(), ServiceOptions::default());
    let response = create_widget(&service, "r1");
    assert_eq!(response.status(), Status::Internal);
    assert_eq!(response.message(), "ledger unavailable: disk full");
    assert!(ledger.is_empty());
}

#[rstest]
fn create_with_empty_id_is_refused_by_the_ledger(service: ReviewService<MemoryLedger>) {
    let response = create_widget(&service, "");
    assert_eq!(response.status(), Status::Internal);
}

#[test]
fn failed_existence_probe_is_a_conflict() {
    let mut store = MockStore::new();
    store
        .expect_get_state()
        .returning(|_| Err(LedgerError::unavailable("timeout")));
    store.expect_put_state().never();
    let service = ReviewService::new(store, ServiceOptions::default());

    let response = service.invoke("create", &args(&["r1", "a", "b", "c", "d", "e"]));
    assert_eq!(response.status(), Status::Conflict);
}

#[test]
fn create_writes_the_lowercased_key_and_encoded_document() {
    let mut store = MockStore::new();
    store.expect_get_state().returning(|_| Ok(None));
    store
        .expect_put_state()
        .withf(|key, value| {
            key.to_string() == "mixed"
                && Document::decode(value)
                    == DecodedDocument::Valid(Document::new("a", "b", "c", "d", "e"))
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let service = ReviewService::new(store, ServiceOptions::default());

    let response = service.invoke("create", &args(&["MiXeD", "a", "b", "c", "d", "e"]));
    assert_eq!(response.status(), Status::Created);
}

#[rstest]
fn search_without_matches_returns_empty_values(service: ReviewService<MemoryLedger>) {
    create_widget(&service, "r1");
    let response = service.invoke("search", &args(&["^Gizmo"]));
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.payload(), Some(br#"{"values":[]}"#.as_slice()));
}

#[rstest]
fn search_is_repeatable_and_ordered_by_key(service: ReviewService<MemoryLedger>) {
    for id in ["r3", "r1", "r2"] {
        create_widget(&service, id);
    }
    let first = service.invoke("search", &args(&["Widget"]));
    let second = service.invoke("search", &args(&["Widget"]));
    assert_eq!(first, second);

    let ids: Vec<_> = payload_json(&first)["values"]
        .as_array()
        .expect("values array")
        .iter()
        .map(|hit| hit["id"].as_str().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(ids, ["r1", "r2", "r3"]);
}

#[rstest]
fn search_caps_results(service: ReviewService<MemoryLedger>) {
    for index in 0..120 {
        create_widget(&service, &format!("r{index:03}"));
    }
    let response = service.invoke("search", &args(&["Widget"]));
    let hits = payload_json(&response)["values"]
        .as_array()
        .map(Vec::len)
        .unwrap_or_default();
    assert_eq!(hits, SEARCH_RESULT_LIMIT);
}

#[rstest]
fn search_pattern_with_quotes_is_matched_literally(service: ReviewService<MemoryLedger>) {
    service.invoke(
        "create",
        &args(&["q1", r#"the "best" widget"#, "ok", "n", "l", "4"]),
    );
    let response = service.invoke("search", &args(&[r#""best""#]));
    assert_eq!(payload_json(&response)["values"][0]["id"], "q1");
}

#[rstest]
fn search_releases_the_cursor(ledger: MemoryLedger) {
    let service = ReviewService::new(ledger.clone(), ServiceOptions::default());
    create_widget(&service, "r1");
    service.invoke("search", &args(&["Widget"]));
    assert_eq!(ledger.open_iterators(), 0);
}

#[rstest]
fn invalid_regex_is_an_internal_error(ledger: MemoryLedger) {
    let service = ReviewService::new(ledger.clone(), ServiceOptions::default());
    let response = service.invoke("search", &args(&["(unclosed"]));
    assert_eq!(response.status(), Status::Internal);
    assert!(response.message().contains("invalid query"));
    assert_eq!(ledger.open_iterators(), 0);
}

#[rstest]
fn query_failures_are_internal_errors(ledger: MemoryLedger) {
    ledger.fail_next(LedgerOperation::Query, "index offline");
    let service = ReviewService::new(ledger, ServiceOptions::default());
    let response = service.invoke("search", &args(&["x"]));
    assert_eq!(response.status(), Status::Internal);
    assert_eq!(response.message(), "ledger unavailable: index offline");
}

#[rstest]
fn corrupt_records_are_salvaged_by_default(ledger: MemoryLedger) {
    ledger
        .put_state("bad", br#"{"text":"Widget","review":"Odd","rating":5}"#)
        .expect("seed");
    let service = ReviewService::new(ledger.clone(), ServiceOptions::default());

    let response = service.invoke("search", &args(&["Widget"]));
    assert_eq!(response.status(), Status::Ok);
    let hit = &payload_json(&response)["values"][0];
    assert_eq!(hit["id"], "bad");
    assert_eq!(hit["product"], "Widget");
    assert_eq!(hit["review"], "Odd");
    assert_eq!(hit["rating"], "");
}

#[rstest]
fn corrupt_records_fail_the_search_when_rejected(ledger: MemoryLedger) {
    ledger
        .put_state("bad", br#"{"text":"Widget","rating":5}"#)
        .expect("seed");
    let options = ServiceOptions {
        corrupt_records: CorruptRecordPolicy::Reject,
        ..ServiceOptions::default()
    };
    let service = ReviewService::new(ledger.clone(), options);

    let response = service.invoke("search", &args(&["Widget"]));
    assert_eq!(response.status(), Status::Internal);
    assert!(response.message().contains("'bad'"));
    assert_eq!(ledger.open_iterators(), 0);
}

#[test]
fn cursor_errors_fail_the_search_and_still_close() {
    let mut cursor = MockCursor::new();
    cursor.expect_has_next().return_const(true);
    cursor
        .expect_next()
        .times(1)
        .returning(|| Err(LedgerError::unavailable("connection reset")));
    cursor.expect_close().times(1).returning(|| Ok(()));

    let mut store = MockStore::new();
    store
        .expect_get_query_result()
        .return_once(move |_| Ok(Box::new(cursor)));
    let service = ReviewService::new(store, ServiceOptions::default());

    let response = service.invoke("search", &args(&["x"]));
    assert_eq!(response.status(), Status::Internal);
    assert_eq!(response.message(), "ledger unavailable: connection reset");
}

#[test]
fn cursor_is_closed_when_a_search_panics() {
    let closed = Arc::new(AtomicBool::new(false));
    let cursor = PanickingCursor {
        closed: Arc::clone(&closed),
    };
    let mut store = MockStore::new();
    store
        .expect_get_query_result()
        .return_once(move |_| Ok(Box::new(cursor)));
    let service = ReviewService::new(store, ServiceOptions::default());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        service.invoke("search", &args(&["x"]))
    }));
    assert!(outcome.is_err());
    assert!(closed.load(Ordering::SeqCst));
}

#[rstest]
fn oversized_documents_are_not_returned(ledger: MemoryLedger) {
    let text = "W".repeat(MAX_PAYLOAD_BYTES);
    let document = Document::new(text, "r", "n", "l", "1");
    ledger
        .put_state("huge", &document.encode().expect("encode"))
        .expect("seed");
    let service = ReviewService::new(ledger, ServiceOptions::default());

    for (operation, argument) in [("read", "huge"), ("search", "^W")] {
        let response = service.invoke(operation, &args(&[argument]));
        assert_eq!(response.status(), Status::Internal, "{operation}");
        assert_eq!(response.message(), PAYLOAD_TOO_LARGE_MESSAGE);
        assert!(response.payload().is_none());
    }
}

#[rstest]
#[case("update")]
#[case("delete")]
#[case("Read")]
fn unknown_operations_are_not_implemented(
    service: ReviewService<MemoryLedger>,
    #[case] operation: &str,
) {
    let response = service.invoke(operation, &args(&["r1"]));
    assert_eq!(response.status(), Status::NotImplemented);
    assert_eq!(
        response.message(),
        "Invalid method! Valid methods are 'create|update|delete|exist|read|history|search'!"
    );
}

#[rstest]
fn missing_arguments_are_bad_requests(service: ReviewService<MemoryLedger>) {
    assert_eq!(service.invoke("read", &[]).status(), Status::BadRequest);
    assert_eq!(service.invoke("search", &[]).status(), Status::BadRequest);
    assert_eq!(
        service.invoke("create", &args(&["r1"])).status(),
        Status::BadRequest
    );
}

#[rstest]
fn enforced_limits_reject_long_ids(ledger: MemoryLedger) {
    let options = ServiceOptions {
        limits: Some(FieldLimits {
            max_id_length: 4,
            max_text_length: 255,
            max_pattern_length: 64,
        }),
        ..ServiceOptions::default()
    };
    let service = ReviewService::new(ledger.clone(), options);
    let response = create_widget(&service, "too-long");
    assert_eq!(response.status(), Status::BadRequest);
    assert!(ledger.is_empty());
}

#[rstest]
fn init_accepts_only_an_empty_argument_list(service: ReviewService<MemoryLedger>) {
    assert_eq!(service.init(&[]).status(), Status::Ok);
    assert_eq!(service.init(&args(&["x"])).status(), Status::BadRequest);
}
