//! Arena storage for the node tree.
//!
//! Nodes live in one `Vec` owned by the tree. Children are held as
//! [`NodeId`] handles in document order; the parent link is a plain handle
//! used for lookup only.

use rustc_hash::FxHashMap;

use crate::node::{Node, NodeId};

#[derive(Clone, Debug, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    index: FxHashMap<String, NodeId>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------
    // Construction (builder only)
    // ---------------------------------------------------------------

    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        let handle = NodeId(self.nodes.len() as u32);
        self.index.insert(node.id.clone(), handle);
        self.nodes.push(node);
        handle
    }

    /// Append `child` under `parent`. The caller guarantees `child` is unattached.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Remove `child` from its parent's children, if it has one.
    pub(crate) fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != child);
        }
    }

    pub(crate) fn push_root(&mut self, root: NodeId) {
        self.roots.push(root);
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, handle: NodeId) -> Option<&Node> {
        self.nodes.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(handle.index())
    }

    /// Look a node up by its source identifier.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.find(id).and_then(|h| self.get(h))
    }

    pub fn children(&self, handle: NodeId) -> &[NodeId] {
        match self.get(handle) {
            Some(node) => node.children(),
            None => &[],
        }
    }

    pub fn parent(&self, handle: NodeId) -> Option<NodeId> {
        self.get(handle).and_then(Node::parent)
    }

    /// Number of nodes held, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order, including orphans.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// `root` and everything below it, pre-order, children in document order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Every node reachable from some root, pre-order.
    pub fn reachable(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|&root| self.descendants(root))
            .collect()
    }

    /// Nested JSON view of the reachable tree, for the emission stage.
    pub fn to_json(&self) -> serde_json::Value {
        let roots: Vec<_> = self.roots.iter().map(|&r| self.nested(r)).collect();
        serde_json::Value::Array(roots)
    }

    fn nested(&self, handle: NodeId) -> serde_json::Value {
        let Some(node) = self.get(handle) else {
            return serde_json::Value::Null;
        };
        let mut value = serde_json::to_value(node).unwrap_or_default();
        let children: Vec<_> = node.children.iter().map(|&c| self.nested(c)).collect();
        if let serde_json::Value::Object(map) = &mut value {
            map.insert("children".to_string(), serde_json::Value::Array(children));
        }
        value
    }
}
