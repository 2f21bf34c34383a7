//! Hierarchical document → flat record list with `parent_id` links.
//!
//! The design tool returns nested `children` arrays; the tree builder wants
//! a flat list. Nodes without a `type` are dropped together with their
//! subtree.

use serde_json::{Map, Value};

/// Top-level kinds worth descending into from a multi-root input.
pub const FLATTEN_ROOT_KINDS: &[&str] = &["CANVAS", "FRAME", "GROUP", "COMPONENT"];

/// Flatten one document (or any subtree) pre-order.
pub fn flatten_document(document: &Value) -> Vec<Value> {
    let mut out = Vec::new();
    flatten_into(document, None, &mut out);
    out
}

/// Flatten several top-level nodes, skipping those that are not
/// page/frame/group/component roots.
pub fn flatten_documents(roots: &[Value]) -> Vec<Value> {
    let mut out = Vec::new();
    for root in roots {
        let kind = root.get("type").and_then(Value::as_str).unwrap_or_default();
        if FLATTEN_ROOT_KINDS.contains(&kind) {
            flatten_into(root, None, &mut out);
        }
    }
    out
}

fn flatten_into(node: &Value, parent: Option<&Map<String, Value>>, out: &mut Vec<Value>) {
    let Some(object) = node.as_object() else {
        return;
    };
    if !object.contains_key("type") {
        return;
    }

    let mut record = object.clone();
    let children = record.remove("children");
    if let Some(parent) = parent {
        record.insert("parent_id".to_string(), parent.get("id").cloned().unwrap_or(Value::Null));
        record.insert(
            "parent_type".to_string(),
            parent.get("type").cloned().unwrap_or(Value::Null),
        );
    }
    out.push(Value::Object(record));

    if let Some(Value::Array(children)) = children {
        for child in &children {
            flatten_into(child, Some(object), out);
        }
    }
}
