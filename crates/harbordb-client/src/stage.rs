//! Bulk submission sequencing.
//!
//! The stager hands intents to the sink one at a time, in batch order,
//! enforcing the ordered/unordered contract and aggregating outcomes. It
//! never reorders and never retries; whatever the sink reports is what the
//! result records.

use harbordb_common::Result;

use crate::bulk::{BatchState, BulkBatch, WriteIntent};
use crate::results::{BulkResult, ItemOutcome};
use crate::sink::{SinkOutcome, StorageSink};

/// Submit a batch to a sink.
///
/// An empty batch completes trivially without touching the sink. Otherwise
/// the sink is asked to admit the batch first; a refusal fails the whole
/// call with `SinkUnavailable` before any intent runs. Ordered mode halts at
/// the first failed intent with [`BatchState::PartiallyCompleted`];
/// unordered mode attempts every intent and finishes as
/// [`BatchState::Failed`] when any of them failed.
pub fn submit(batch: BulkBatch, sink: &mut dyn StorageSink) -> Result<BulkResult> {
    if batch.is_empty() {
        return Ok(BulkResult::empty());
    }

    sink.accept(batch.len())?;

    let ordered = batch.is_ordered();
    tracing::debug!(intents = batch.len(), ordered, "bulk batch running");

    let mut result = BulkResult::running();
    let mut halted = false;
    for (index, intent) in batch.into_intents().into_iter().enumerate() {
        let outcome = dispatch(sink, &intent);
        let failed = outcome.is_failure();
        if failed {
            tracing::warn!(index, kind = %intent.kind(), "write intent failed");
        }
        result.record(ItemOutcome {
            index,
            kind: intent.kind(),
            outcome,
        });

        if failed && ordered {
            halted = true;
            break;
        }
    }

    let state = if halted {
        BatchState::PartiallyCompleted
    } else if result.has_failures() {
        BatchState::Failed
    } else {
        BatchState::Completed
    };
    result.finish(state);

    tracing::debug!(state = ?result.state(), outcomes = result.outcomes().len(), "bulk batch finished");
    Ok(result)
}

fn dispatch(sink: &mut dyn StorageSink, intent: &WriteIntent) -> SinkOutcome {
    match intent {
        WriteIntent::Insert { document } => sink.insert(document),
        WriteIntent::Update { filter, update } => sink.update(filter, update),
        WriteIntent::Delete { filter } => sink.delete(filter),
        WriteIntent::Replace { filter, document } => sink.replace(filter, document),
    }
}

// Tests
