//! Mixed bulk batches against the in-memory sink, ordered and unordered.

use harbordb_client::{BatchState, BulkBatch, MemorySink, StorageSink};
use harbordb_common::{HarborError, Value, document};
use pretty_assertions::assert_eq;

/// Sink pre-seeded with documents `_id` 1..=3.
fn seeded_sink() -> MemorySink {
    let mut sink = MemorySink::new();
    for id in 1..=3 {
        sink.insert(&document! { "_id": id });
    }
    sink
}

/// Six mixed operations: three inserts, a `$set` update, a delete, and a
/// replace.
fn mixed_batch(mut batch: BulkBatch) -> BulkBatch {
    batch.insert(document! { "_id": 4 });
    batch.insert(document! { "_id": 5 });
    batch.insert(document! { "_id": 6 });
    batch.update(
        document! { "_id": 1 },
        document! { "$set": document! { "x": 2 } },
    );
    batch.delete(document! { "_id": 3 });
    batch.replace(document! { "_id": 2 }, document! { "_id": 2, "x": 4 });
    batch
}

#[test]
fn test_mixed_batch_ordered() {
    let mut sink = seeded_sink();
    let result = mixed_batch(BulkBatch::ordered()).submit(&mut sink).unwrap();

    assert_eq!(result.state(), BatchState::Completed);
    assert_eq!(result.outcomes().len(), 6);
    assert_eq!(result.inserted_count(), 3);
    assert_eq!(result.matched_count(), 2);
    assert_eq!(result.modified_count(), 2);
    assert_eq!(result.deleted_count(), 1);
    assert_eq!(result.upserted_count(), 0);

    assert_eq!(sink.len(), 5);
    assert_eq!(sink.find(&document! { "_id": 1 }).unwrap()["x"], Value::Int32(2));
    assert_eq!(sink.find(&document! { "_id": 2 }).unwrap()["x"], Value::Int32(4));
    assert!(sink.find(&document! { "_id": 3 }).is_none());
}

#[test]
fn test_mixed_batch_unordered_matches_ordered_effects() {
    let mut sink = seeded_sink();
    let result = mixed_batch(BulkBatch::unordered())
        .submit(&mut sink)
        .unwrap();

    assert_eq!(result.state(), BatchState::Completed);
    assert_eq!(result.outcomes().len(), 6);
    assert_eq!(sink.len(), 5);
}

#[test]
fn test_ordered_halts_on_duplicate_key() {
    let mut sink = seeded_sink();

    let mut batch = BulkBatch::ordered();
    batch.insert(document! { "_id": 1 }); // duplicate of the seeded document
    batch.insert(document! { "_id": 7 });
    batch.delete(document! { "_id": 2 });

    let result = batch.submit(&mut sink).unwrap();
    assert_eq!(result.state(), BatchState::PartiallyCompleted);
    assert_eq!(result.outcomes().len(), 1);
    assert!(result.outcomes()[0].is_failure());

    // Nothing after the failure ran.
    assert!(sink.find(&document! { "_id": 7 }).is_none());
    assert!(sink.find(&document! { "_id": 2 }).is_some());
}

#[test]
fn test_unordered_records_every_outcome() {
    let mut sink = seeded_sink();

    let mut batch = BulkBatch::unordered();
    batch.insert(document! { "_id": 1 }); // duplicate of the seeded document
    batch.insert(document! { "_id": 7 });
    batch.delete(document! { "_id": 2 });

    let result = batch.submit(&mut sink).unwrap();
    assert_eq!(result.state(), BatchState::Failed);
    assert_eq!(result.outcomes().len(), 3);
    assert_eq!(result.failures().count(), 1);
    assert_eq!(result.inserted_count(), 1);
    assert_eq!(result.deleted_count(), 1);

    // Later intents ran despite the early failure.
    assert!(sink.find(&document! { "_id": 7 }).is_some());
    assert!(sink.find(&document! { "_id": 2 }).is_none());
}

#[test]
fn test_sink_unavailable_before_any_intent() {
    let mut sink = seeded_sink();
    sink.fail_admission("connection refused");

    let err = mixed_batch(BulkBatch::ordered())
        .submit(&mut sink)
        .unwrap_err();
    assert!(matches!(err, HarborError::SinkUnavailable(_)));

    // No partial state: the seeded documents are untouched.
    assert_eq!(sink.len(), 3);
    assert!(sink.find(&document! { "_id": 3 }).is_some());
}

#[test]
fn test_empty_batch_is_a_completed_no_op() {
    let mut sink = seeded_sink();
    let result = BulkBatch::unordered().submit(&mut sink).unwrap();

    assert_eq!(result.state(), BatchState::Completed);
    assert_eq!(result.outcomes().len(), 0);
    assert_eq!(result.inserted_count(), 0);
    assert_eq!(sink.len(), 3);
}
