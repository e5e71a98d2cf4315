//! Seeding flows: encode typed records and stage them into a sink.

use std::cell::RefCell;
use std::rc::Rc;

use harbordb_client::{BulkBatch, FieldValue, MemorySink, Record, encode};
use harbordb_common::{Document, Value, document};
use pretty_assertions::assert_eq;

// A file owns its items; an item's link to its node and a node's links to
// its parent and grouped items are navigational only.

struct File {
    label: String,
    version: i32,
    is_active: bool,
    items: Vec<Rc<RefCell<FileItem>>>,
}

struct FileItem {
    label: String,
    #[allow(dead_code)]
    node: Option<Rc<RefCell<FileNode>>>,
}

#[allow(dead_code)]
struct FileNode {
    parent: Option<Rc<RefCell<FileNode>>>,
    items: Vec<Rc<RefCell<FileItem>>>,
}

impl Record for File {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("Label", FieldValue::Scalar(Value::from(self.label.as_str()))),
            ("Version", FieldValue::Scalar(Value::from(self.version))),
            ("IsActive", FieldValue::Scalar(Value::from(self.is_active))),
            (
                "Items",
                FieldValue::Many(
                    self.items
                        .iter()
                        .map(|item| Rc::clone(item) as Rc<dyn Record>)
                        .collect(),
                ),
            ),
        ]
    }
}

impl Record for FileItem {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("Label", FieldValue::Scalar(Value::from(self.label.as_str()))),
            ("Node", FieldValue::BackRef),
        ]
    }
}

/// Two items whose nodes share a parent/child link, with every item
/// pointing back at its containing node.
fn generate_items() -> Vec<Rc<RefCell<FileItem>>> {
    let item1 = Rc::new(RefCell::new(FileItem {
        label: "Item1".into(),
        node: None,
    }));
    let child_item = Rc::new(RefCell::new(FileItem {
        label: "ChildItem1".into(),
        node: None,
    }));

    let item1_node = Rc::new(RefCell::new(FileNode {
        items: vec![Rc::clone(&item1)],
        parent: None,
    }));
    let child_node = Rc::new(RefCell::new(FileNode {
        items: vec![Rc::clone(&child_item)],
        parent: Some(Rc::clone(&item1_node)),
    }));

    item1.borrow_mut().node = Some(item1_node);
    child_item.borrow_mut().node = Some(child_node);

    vec![item1, child_item]
}

#[test]
fn test_seed_literal_document() {
    let seed = document! {
        "name": "HarborDB",
        "type": "Database",
        "count": 1,
        "info": document! { "x": 203, "y": 102 },
    };

    let mut sink = MemorySink::new();
    let mut batch = BulkBatch::ordered();
    batch.insert(seed.clone());

    let result = batch.submit(&mut sink).unwrap();
    assert!(result.is_complete());
    assert_eq!(result.inserted_count(), 1);

    let stored = sink.find(&document! { "name": "HarborDB" }).unwrap();
    assert_eq!(stored["info"]["x"], Value::Int32(203));
    assert!(stored.contains_key("_id"));

    // The literal survives a JSON round trip unchanged.
    assert_eq!(Document::from_json(seed.to_json()).unwrap(), seed);
}

#[test]
fn test_seed_simple_record() {
    let file = File {
        label: "This is a test".into(),
        version: 1,
        is_active: true,
        items: vec![],
    };

    let doc = encode(&file).unwrap();
    assert_eq!(doc["Label"], Value::String("This is a test".into()));
    assert_eq!(doc["Version"], Value::Int32(1));
    assert_eq!(doc["IsActive"], Value::Bool(true));
    assert_eq!(doc["Items"], Value::Array(vec![]));

    let mut sink = MemorySink::new();
    let mut batch = BulkBatch::ordered();
    batch.insert(doc);

    let result = batch.submit(&mut sink).unwrap();
    assert!(result.is_complete());
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_seed_complex_record() {
    let file = File {
        label: "This is a test for a complex object".into(),
        version: 1,
        is_active: true,
        items: generate_items(),
    };

    // The node graph carries parent links, yet encoding terminates and the
    // output holds only owned structure.
    let doc = encode(&file).unwrap();
    let items = doc["Items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["Label"], Value::String("Item1".into()));
    assert_eq!(items[1]["Label"], Value::String("ChildItem1".into()));
    for item in items {
        let item = item.as_document().unwrap();
        assert_eq!(item.len(), 1);
        assert!(!item.contains_key("Node"));
    }

    // Encoding is deterministic over an unmodified graph.
    assert_eq!(doc, encode(&file).unwrap());

    let mut sink = MemorySink::new();
    let mut batch = BulkBatch::ordered();
    batch.insert(doc);

    let result = batch.submit(&mut sink).unwrap();
    assert!(result.is_complete());
    assert_eq!(result.inserted_count(), 1);
}
