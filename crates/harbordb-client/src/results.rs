//! Bulk submission result types.

use serde::{Deserialize, Serialize};

use crate::bulk::{BatchState, IntentKind};
use crate::sink::SinkOutcome;

/// Outcome of one intent, in batch position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// Position of the intent in the batch.
    pub index: usize,
    /// Operation kind.
    pub kind: IntentKind,
    /// What the sink reported.
    pub outcome: SinkOutcome,
}

impl ItemOutcome {
    /// Check whether this item failed.
    pub fn is_failure(&self) -> bool {
        self.outcome.is_failure()
    }

    /// Failure reason, if this item failed.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            SinkOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Aggregate result of a bulk submission.
///
/// The outcome list covers every intent when the batch ran unordered; in
/// ordered mode it stops at the first failure, and outcomes for intents that
/// were never attempted do not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkResult {
    state: BatchState,
    inserted: u64,
    matched: u64,
    modified: u64,
    deleted: u64,
    upserted: u64,
    outcomes: Vec<ItemOutcome>,
}

impl BulkResult {
    /// Result of submitting an empty batch: trivially complete, all counts
    /// zero.
    pub(crate) fn empty() -> Self {
        Self {
            state: BatchState::Completed,
            inserted: 0,
            matched: 0,
            modified: 0,
            deleted: 0,
            upserted: 0,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn running() -> Self {
        Self {
            state: BatchState::Running,
            ..Self::empty()
        }
    }

    /// Record one item outcome and fold its counts into the aggregates.
    pub(crate) fn record(&mut self, item: ItemOutcome) {
        match &item.outcome {
            SinkOutcome::Inserted { .. } => self.inserted += 1,
            SinkOutcome::Updated { matched, modified } => {
                self.matched += matched;
                self.modified += modified;
            }
            SinkOutcome::Deleted { deleted } => self.deleted += deleted,
            SinkOutcome::Upserted { .. } => self.upserted += 1,
            SinkOutcome::Failed { .. } => {}
        }
        self.outcomes.push(item);
    }

    pub(crate) fn finish(&mut self, state: BatchState) {
        self.state = state;
    }

    /// Final batch state.
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Check whether every intent succeeded (or the batch was empty).
    pub fn is_complete(&self) -> bool {
        self.state == BatchState::Completed
    }

    /// Check whether any recorded outcome is a failure.
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(ItemOutcome::is_failure)
    }

    /// Number of documents inserted.
    pub fn inserted_count(&self) -> u64 {
        self.inserted
    }

    /// Number of documents matched by updates and replaces.
    pub fn matched_count(&self) -> u64 {
        self.matched
    }

    /// Number of documents actually modified.
    pub fn modified_count(&self) -> u64 {
        self.modified
    }

    /// Number of documents deleted.
    pub fn deleted_count(&self) -> u64 {
        self.deleted
    }

    /// Number of documents upserted.
    pub fn upserted_count(&self) -> u64 {
        self.upserted
    }

    /// Per-item outcomes, in batch position order.
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    /// The failed outcomes only.
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|item| item.is_failure())
    }
}
