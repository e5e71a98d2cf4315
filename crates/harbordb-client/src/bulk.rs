//! Write intents and batch assembly.

use serde::{Deserialize, Serialize};

use harbordb_common::{Document, Result};

use crate::results::BulkResult;
use crate::sink::StorageSink;
use crate::stage;

/// One staged mutation operation.
///
/// Filters are plain documents used for matching; this core enforces no
/// schema against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WriteIntent {
    Insert {
        document: Document,
    },
    Update {
        filter: Document,
        update: Document,
    },
    Delete {
        filter: Document,
    },
    Replace {
        filter: Document,
        document: Document,
    },
}

impl WriteIntent {
    /// Operation kind tag, for outcome labeling.
    pub fn kind(&self) -> IntentKind {
        match self {
            WriteIntent::Insert { .. } => IntentKind::Insert,
            WriteIntent::Update { .. } => IntentKind::Update,
            WriteIntent::Delete { .. } => IntentKind::Delete,
            WriteIntent::Replace { .. } => IntentKind::Replace,
        }
    }
}

/// The closed set of write operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Insert,
    Update,
    Delete,
    Replace,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Insert => "insert",
            IntentKind::Update => "update",
            IntentKind::Delete => "delete",
            IntentKind::Replace => "replace",
        }
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Batch lifecycle state.
///
/// A batch is `Pending` while it is being assembled, `Running` from the
/// instant submission begins (entered exactly once), and finishes as
/// `Completed` (every intent succeeded, or the batch was empty),
/// `PartiallyCompleted` (ordered mode halted at its first failure), or
/// `Failed` (unordered mode with at least one failure, every intent
/// attempted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Pending,
    Running,
    Completed,
    PartiallyCompleted,
    Failed,
}

/// An ordered collection of write intents submitted as a unit.
///
/// Intents run in append order. In ordered mode the first failure halts the
/// batch; in unordered mode every intent is attempted regardless of earlier
/// failures. (Unordered refers to failure handling, not sequencing: the
/// stager itself never reorders.)
///
/// # Example
/// ```rust
/// use harbordb_client::{BulkBatch, MemorySink};
/// use harbordb_common::document;
///
/// let mut batch = BulkBatch::ordered();
/// batch.insert(document! { "_id": 1, "name": "first" });
/// batch.update(
///     document! { "_id": 1 },
///     document! { "$set": document! { "name": "renamed" } },
/// );
///
/// let mut sink = MemorySink::new();
/// let result = batch.submit(&mut sink).unwrap();
/// assert!(result.is_complete());
/// ```
#[derive(Debug)]
pub struct BulkBatch {
    intents: Vec<WriteIntent>,
    ordered: bool,
}

impl BulkBatch {
    /// Create an empty ordered batch.
    pub fn ordered() -> Self {
        Self {
            intents: Vec::new(),
            ordered: true,
        }
    }

    /// Create an empty unordered batch.
    pub fn unordered() -> Self {
        Self {
            intents: Vec::new(),
            ordered: false,
        }
    }

    /// Append an intent.
    pub fn push(&mut self, intent: WriteIntent) {
        self.intents.push(intent);
    }

    /// Append an insert.
    pub fn insert(&mut self, document: Document) {
        self.push(WriteIntent::Insert { document });
    }

    /// Append an update.
    pub fn update(&mut self, filter: Document, update: Document) {
        self.push(WriteIntent::Update { filter, update });
    }

    /// Append a delete.
    pub fn delete(&mut self, filter: Document) {
        self.push(WriteIntent::Delete { filter });
    }

    /// Append a replace.
    pub fn replace(&mut self, filter: Document, document: Document) {
        self.push(WriteIntent::Replace { filter, document });
    }

    /// Number of staged intents.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Check whether the batch holds no intents.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Whether the batch runs in ordered mode.
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// The staged intents, in append order.
    pub fn intents(&self) -> &[WriteIntent] {
        &self.intents
    }

    /// Submit the batch to a sink.
    ///
    /// Consumes the batch: a batch is submitted exactly once, and neither it
    /// nor its intents can change once submission begins.
    pub fn submit(self, sink: &mut dyn StorageSink) -> Result<BulkResult> {
        stage::submit(self, sink)
    }

    pub(crate) fn into_intents(self) -> Vec<WriteIntent> {
        self.intents
    }
}

// Tests
