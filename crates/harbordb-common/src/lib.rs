//! Common library for HarborDB
//!
//! This crate provides the types shared by every HarborDB client component:
//! the storage value model, the tree-shaped document type, and the error
//! taxonomy.
//!
//! Modules:
//! * `error`: Defines error types and handling.
//! * `value`: Defines data value types used in document operations.
//! * `document`: Defines the tree-shaped document type and the `document!` macro.

pub mod document;
pub mod error;
pub mod value;

// Re-export commonly used types at the base
pub use document::Document;
pub use error::*;
pub use value::{ObjectId, Value};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
