//! Storage sink contract and the in-memory reference sink.
//!
//! The sink is the core's only outward boundary: the component that actually
//! persists individual writes. The stager hands intents across this seam and
//! aggregates whatever comes back; it never looks behind it.

use serde::{Deserialize, Serialize};

use harbordb_common::{Document, HarborError, ObjectId, Result, Value};

/// Outcome of a single write handed to a sink.
///
/// Success variants carry the counts or identifiers the caller aggregates;
/// a failed write is data, not an error, so one bad intent never aborts the
/// caller's control flow on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkOutcome {
    Inserted {
        id: Option<Value>,
    },
    Updated {
        matched: u64,
        modified: u64,
    },
    Deleted {
        deleted: u64,
    },
    Upserted {
        id: Value,
    },
    Failed {
        reason: String,
    },
}

impl SinkOutcome {
    /// Check whether this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, SinkOutcome::Failed { .. })
    }
}

/// External collaborator performing actual persistence of individual
/// operations.
///
/// Implementations own all storage semantics, including concurrency safety:
/// the stager adds no locking and submits strictly in sequence from one
/// thread. An implementation documented as safe for concurrent use may be
/// shared by distinct batches; nothing here requires it.
pub trait StorageSink {
    /// Whole-batch admission check, called once before any intent is handed
    /// over. Rejecting here fails the entire batch with
    /// [`HarborError::SinkUnavailable`] and no intent is attempted.
    fn accept(&mut self, intents: usize) -> Result<()> {
        let _ = intents;
        Ok(())
    }

    /// Persist one document.
    fn insert(&mut self, document: &Document) -> SinkOutcome;

    /// Apply an update document to everything matching the filter.
    fn update(&mut self, filter: &Document, update: &Document) -> SinkOutcome;

    /// Remove everything matching the filter.
    fn delete(&mut self, filter: &Document) -> SinkOutcome;

    /// Swap the first match for the given document.
    fn replace(&mut self, filter: &Document, document: &Document) -> SinkOutcome;
}

/// In-memory sink for tests and demos.
///
/// Filters match by top-level field equality (an empty filter matches every
/// document). Updates understand the `$set` and `$unset` operator documents;
/// anything else fails the intent. Inserted documents receive a generated
/// `_id` when they carry none.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Vec<Document>,
    refusal: Option<String>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored documents, in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check whether the sink holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Make the next `accept` call reject its batch with the given reason.
    pub fn fail_admission(&mut self, reason: impl Into<String>) {
        self.refusal = Some(reason.into());
    }

    /// First stored document matching the filter.
    pub fn find(&self, filter: &Document) -> Option<&Document> {
        self.documents.iter().find(|doc| Self::matches(doc, filter))
    }

    fn matches(document: &Document, filter: &Document) -> bool {
        filter
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }
}

impl StorageSink for MemorySink {
    fn accept(&mut self, intents: usize) -> Result<()> {
        if let Some(reason) = self.refusal.take() {
            return Err(HarborError::SinkUnavailable(reason));
        }
        tracing::debug!(intents, "memory sink admitted batch");
        Ok(())
    }

    fn insert(&mut self, document: &Document) -> SinkOutcome {
        let mut document = document.clone();
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }

        let id = document.get("_id").cloned();
        if let Some(id_value) = &id
            && self.documents.iter().any(|d| d.get("_id") == Some(id_value))
        {
            return SinkOutcome::Failed {
                reason: format!("duplicate key: _id {id_value}"),
            };
        }

        self.documents.push(document);
        SinkOutcome::Inserted { id }
    }

    fn update(&mut self, filter: &Document, update: &Document) -> SinkOutcome {
        if update.is_empty() {
            return SinkOutcome::Failed {
                reason: "empty update document".into(),
            };
        }
        for (operator, operand) in update.iter() {
            if operator != "$set" && operator != "$unset" {
                return SinkOutcome::Failed {
                    reason: format!("unsupported update operator '{operator}'"),
                };
            }
            if operand.as_document().is_none() {
                return SinkOutcome::Failed {
                    reason: format!("'{operator}' expects a document operand"),
                };
            }
        }

        let mut matched = 0;
        let mut modified = 0;
        for doc in self.documents.iter_mut() {
            if !Self::matches(doc, filter) {
                continue;
            }
            matched += 1;

            let mut changed = false;
            if let Some(Value::Document(set)) = update.get("$set") {
                for (field, value) in set.iter() {
                    if doc.get(field) != Some(value) {
                        doc.insert(field.clone(), value.clone());
                        changed = true;
                    }
                }
            }
            if let Some(Value::Document(unset)) = update.get("$unset") {
                for (field, _) in unset.iter() {
                    if doc.remove(field).is_some() {
                        changed = true;
                    }
                }
            }
            if changed {
                modified += 1;
            }
        }

        SinkOutcome::Updated { matched, modified }
    }

    fn delete(&mut self, filter: &Document) -> SinkOutcome {
        let before = self.documents.len();
        self.documents.retain(|doc| !Self::matches(doc, filter));

        // Zero matches is still a successful delete.
        SinkOutcome::Deleted {
            deleted: (before - self.documents.len()) as u64,
        }
    }

    fn replace(&mut self, filter: &Document, document: &Document) -> SinkOutcome {
        let Some(existing) = self.documents.iter_mut().find(|d| Self::matches(d, filter)) else {
            return SinkOutcome::Updated {
                matched: 0,
                modified: 0,
            };
        };

        let mut replacement = document.clone();
        if let (Some(old), Some(new)) = (existing.get("_id"), replacement.get("_id"))
            && old != new
        {
            return SinkOutcome::Failed {
                reason: "replacement must not change _id".into(),
            };
        }
        if !replacement.contains_key("_id")
            && let Some(old) = existing.get("_id")
        {
            let old = old.clone();
            replacement.insert("_id", old);
        }

        let modified = u64::from(*existing != replacement);
        *existing = replacement;
        SinkOutcome::Updated {
            matched: 1,
            modified,
        }
    }
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use harbordb_common::document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_assigns_id() {
        let mut sink = MemorySink::new();

        let outcome = sink.insert(&document! { "name": "a" });
        match outcome {
            SinkOutcome::Inserted { id: Some(id) } => {
                assert!(matches!(id, Value::ObjectId(_)));
            }
            other => panic!("Expected inserted outcome, got {other:?}"),
        }
        assert_eq!(sink.len(), 1);
        assert!(sink.documents()[0].contains_key("_id"));
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut sink = MemorySink::new();

        assert!(!sink.insert(&document! { "_id": 4 }).is_failure());
        let outcome = sink.insert(&document! { "_id": 4 });
        assert!(outcome.is_failure());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_update_set_and_unset() {
        let mut sink = MemorySink::new();
        sink.insert(&document! { "_id": 1, "x": 1, "tmp": true });
        sink.insert(&document! { "_id": 2, "x": 1 });

        let outcome = sink.update(
            &document! { "x": 1 },
            &document! { "$set": document! { "x": 2 }, "$unset": document! { "tmp": 1 } },
        );
        assert_eq!(
            outcome,
            SinkOutcome::Updated {
                matched: 2,
                modified: 2
            }
        );
        assert_eq!(sink.documents()[0]["x"], Value::Int32(2));
        assert!(!sink.documents()[0].contains_key("tmp"));
    }

    #[test]
    fn test_update_rejects_unknown_operator() {
        let mut sink = MemorySink::new();
        sink.insert(&document! { "_id": 1 });

        let outcome = sink.update(&document! {}, &document! { "$rename": document! {} });
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_update_counts_unmodified_matches() {
        let mut sink = MemorySink::new();
        sink.insert(&document! { "_id": 1, "x": 2 });

        let outcome = sink.update(&document! {}, &document! { "$set": document! { "x": 2 } });
        assert_eq!(
            outcome,
            SinkOutcome::Updated {
                matched: 1,
                modified: 0
            }
        );
    }

    #[test]
    fn test_delete_zero_matches_succeeds() {
        let mut sink = MemorySink::new();
        sink.insert(&document! { "_id": 1 });

        let outcome = sink.delete(&document! { "_id": 99 });
        assert_eq!(outcome, SinkOutcome::Deleted { deleted: 0 });
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_replace_keeps_id() {
        let mut sink = MemorySink::new();
        sink.insert(&document! { "_id": 3, "x": 1 });

        let outcome = sink.replace(&document! { "_id": 3 }, &document! { "x": 4 });
        assert_eq!(
            outcome,
            SinkOutcome::Updated {
                matched: 1,
                modified: 1
            }
        );
        let doc = sink.find(&document! { "_id": 3 }).unwrap();
        assert_eq!(doc["x"], Value::Int32(4));
        assert_eq!(doc["_id"], Value::Int32(3));
    }

    #[test]
    fn test_replace_rejects_id_change() {
        let mut sink = MemorySink::new();
        sink.insert(&document! { "_id": 3, "x": 1 });

        let outcome = sink.replace(&document! { "_id": 3 }, &document! { "_id": 4, "x": 4 });
        assert!(outcome.is_failure());
        assert_eq!(sink.documents()[0]["_id"], Value::Int32(3));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let mut sink = MemorySink::new();
        sink.insert(&document! { "_id": 1 });
        sink.insert(&document! { "_id": 2 });

        let outcome = sink.delete(&document! {});
        assert_eq!(outcome, SinkOutcome::Deleted { deleted: 2 });
        assert!(sink.is_empty());
    }

    #[test]
    fn test_admission_refusal() {
        let mut sink = MemorySink::new();
        sink.fail_admission("maintenance window");

        let err = sink.accept(1).unwrap_err();
        assert!(matches!(err, HarborError::SinkUnavailable(_)));

        // Refusal is one-shot.
        assert!(sink.accept(1).is_ok());
    }
}
