//! HarborDB Client Core
//!
//! Document mapping and bulk-write staging for a document-store client.
//! Two independent pieces, composed by the caller:
//!
//! * the **encoder** ([`encode`], [`Record`]) turns typed object graphs,
//!   including graphs holding parent back-references, into tree-shaped
//!   [`harbordb_common::Document`] values;
//! * the **stager** ([`BulkBatch`], [`submit`]) hands a batch of
//!   heterogeneous write intents to a [`StorageSink`] with ordered or
//!   unordered execution semantics and reports per-item and aggregate
//!   outcomes in a [`BulkResult`].
//!
//! Transport, authentication, and query execution live behind the sink and
//! are someone else's problem. Both pieces are synchronous; encode before
//! staging.
//!
//! # Example
//!
//! ```rust
//! use harbordb_client::{BulkBatch, MemorySink};
//! use harbordb_common::document;
//!
//! fn main() -> harbordb_common::Result<()> {
//!     let mut sink = MemorySink::new();
//!
//!     let mut batch = BulkBatch::ordered();
//!     batch.insert(document! { "name": "HarborDB", "count": 1 });
//!     batch.update(
//!         document! { "name": "HarborDB" },
//!         document! { "$set": document! { "count": 2 } },
//!     );
//!
//!     let result = batch.submit(&mut sink)?;
//!     assert!(result.is_complete());
//!     assert_eq!(result.inserted_count(), 1);
//!     Ok(())
//! }
//! ```

pub use bulk::{BatchState, BulkBatch, IntentKind, WriteIntent};
pub use encode::{EncodeOptions, FieldValue, Record, encode, encode_with};
pub use results::{BulkResult, ItemOutcome};
pub use sink::{MemorySink, SinkOutcome, StorageSink};
pub use stage::submit;

mod bulk;
mod encode;
mod results;
mod sink;
mod stage;
