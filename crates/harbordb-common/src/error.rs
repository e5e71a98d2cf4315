//! Error definitions for HarborDB

use thiserror::Error;

/// Represents errors that can occur during HarborDB client operations.
///
/// Per-intent write failures are not errors: they are captured in the
/// submission result's outcome list. An empty bulk batch is not an error
/// either; it completes trivially. Everything that does abort a call is an
/// explicit variant here.
///
/// # Example
/// ```rust
/// use harbordb_common::HarborError;
///
/// fn example() -> harbordb_common::Result<()> {
///     Err(HarborError::SinkUnavailable("connection refused".into()))
/// }
///
/// match example() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error occurred: {e}"),
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum HarborError {
    /// The encoder revisited a record through an owning edge already on the
    /// current traversal path. Not retryable without fixing the input graph.
    #[error("Cycle detected: {0}")]
    CycleDetected(String),

    /// A record field's runtime value has no document representation.
    #[error("Unsupported field type: field '{field}' has no document mapping ({type_name})")]
    UnsupportedFieldType { field: String, type_name: String },

    /// The sink rejected an entire batch before processing any intent.
    /// The batch failed as a whole; the caller may retry at its discretion.
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),

    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, HarborError>;

impl HarborError {
    /// Get the inner message without the type prefix.
    /// Useful when re-wrapping errors to avoid "Parse error: Parse error: ..."
    pub fn message(&self) -> &str {
        match self {
            HarborError::CycleDetected(msg) => msg,
            HarborError::UnsupportedFieldType { field, .. } => field, // Partial, but acceptable
            HarborError::SinkUnavailable(msg) => msg,
            HarborError::TypeError {
                expected,
                actual: _,
            } => expected, // Partial, but acceptable
            HarborError::Parse(msg) => msg,
        }
    }

    /// Get a short error kind name
    pub fn kind(&self) -> &'static str {
        match self {
            HarborError::CycleDetected(_) => "cycle_detected",
            HarborError::UnsupportedFieldType { .. } => "unsupported_field_type",
            HarborError::SinkUnavailable(_) => "sink_unavailable",
            HarborError::TypeError { .. } => "type_error",
            HarborError::Parse(_) => "parse_error",
        }
    }
}
