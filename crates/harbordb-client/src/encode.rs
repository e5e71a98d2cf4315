//! Typed record encoding.
//!
//! Converts typed object graphs, including graphs holding parent
//! back-references, into tree-shaped [`Document`] values. The encoder is
//! pure: no I/O, and encoding an unmodified record twice yields structurally
//! equal documents.

use std::cell::RefCell;
use std::rc::Rc;

use harbordb_common::{Document, HarborError, Result, Value};

/// Classification of one declared record field.
pub enum FieldValue {
    /// Leaf value.
    Scalar(Value),
    /// Owning edge to a single nested record.
    Nested(Rc<dyn Record>),
    /// Owning collection of nested records. An empty collection encodes as
    /// an empty array, never null.
    Many(Vec<Rc<dyn Record>>),
    /// Declared navigational parent pointer. Never traversed and never
    /// emitted; it exists on the record for lookup only.
    BackRef,
    /// A runtime value with no document mapping. Encoding the record fails
    /// with [`HarborError::UnsupportedFieldType`] naming the field.
    Unsupported(&'static str),
}

/// A typed record that can be encoded into a [`Document`].
///
/// Implementors list their declared fields in declaration order as
/// `(name, classification)` pairs. Owning edges (`Nested`, `Many`) form the
/// record tree; a field holding a pointer back toward the root must be
/// declared [`FieldValue::BackRef`] so the encoder excludes it instead of
/// recursing forever.
///
/// # Example
/// ```rust
/// use harbordb_client::{FieldValue, Record, encode};
/// use harbordb_common::Value;
///
/// struct Account {
///     name: String,
///     active: bool,
/// }
///
/// impl Record for Account {
///     fn fields(&self) -> Vec<(&'static str, FieldValue)> {
///         vec![
///             ("Name", FieldValue::Scalar(Value::from(self.name.as_str()))),
///             ("Active", FieldValue::Scalar(Value::from(self.active))),
///         ]
///     }
/// }
///
/// let doc = encode(&Account { name: "test".into(), active: true }).unwrap();
/// assert_eq!(doc["Name"], Value::String("test".into()));
/// ```
pub trait Record {
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;
}

/// Records behind `RefCell` (the usual shape for graphs carrying parent
/// pointers) encode through a borrow.
impl<T: Record> Record for RefCell<T> {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        self.borrow().fields()
    }
}

/// Encoder configuration.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Drop null-valued fields from the output instead of encoding explicit
    /// nulls.
    pub omit_null: bool,
}

/// Encode a record with default options.
pub fn encode(record: &dyn Record) -> Result<Document> {
    encode_with(record, &EncodeOptions::default())
}

/// Encode a record into a document.
///
/// Traversal is depth-first over declared fields in declaration order. Each
/// owning edge pushes the child's identity onto the current path before
/// recursing and pops it after; revisiting an identity already on the path
/// fails with [`HarborError::CycleDetected`]. Sharing a subtree between
/// sibling edges is not a cycle: the subtree simply encodes once per
/// occurrence.
pub fn encode_with(record: &dyn Record, options: &EncodeOptions) -> Result<Document> {
    let mut path = vec![std::ptr::from_ref(record) as *const () as usize];
    encode_record(record, options, &mut path)
}

fn encode_record(
    record: &dyn Record,
    options: &EncodeOptions,
    path: &mut Vec<usize>,
) -> Result<Document> {
    let mut doc = Document::new();

    for (name, field) in record.fields() {
        match field {
            FieldValue::Scalar(Value::Null) if options.omit_null => {}
            FieldValue::Scalar(value) => {
                doc.insert(name, value);
            }
            FieldValue::Nested(child) => {
                let nested = encode_child(&child, name, options, path)?;
                doc.insert(name, Value::Document(nested));
            }
            FieldValue::Many(children) => {
                let mut items = Vec::with_capacity(children.len());
                for child in &children {
                    items.push(Value::Document(encode_child(child, name, options, path)?));
                }
                doc.insert(name, Value::Array(items));
            }
            FieldValue::BackRef => {}
            FieldValue::Unsupported(type_name) => {
                return Err(HarborError::UnsupportedFieldType {
                    field: name.to_string(),
                    type_name: type_name.to_string(),
                });
            }
        }
    }

    Ok(doc)
}

fn encode_child(
    child: &Rc<dyn Record>,
    field: &'static str,
    options: &EncodeOptions,
    path: &mut Vec<usize>,
) -> Result<Document> {
    let identity = Rc::as_ptr(child) as *const () as usize;
    if path.contains(&identity) {
        return Err(HarborError::CycleDetected(format!(
            "record revisited through owning field '{field}'"
        )));
    }

    path.push(identity);
    let doc = encode_record(child.as_ref(), options, path)?;
    path.pop();

    Ok(doc)
}

// Tests
