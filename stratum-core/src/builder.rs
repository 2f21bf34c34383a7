//! Flat record list → node tree.
//!
//! Two passes: create every decodable node, then wire `parent_id` links.
//! Nothing in here fails as a whole. Bad records are skipped and reported,
//! unresolvable parents leave the record orphaned, and a list with no root
//! candidate gets its first node promoted to root.

use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::error::RecordError;
use crate::node::{Node, NodeId};
use crate::raw::{decode_record, NodeDraft, ParentLink};
use crate::tree::NodeTree;

/// A record that never became a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the input list.
    pub index: usize,
    pub error: RecordError,
}

/// Outcome of a `build()` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Nodes created.
    pub built: usize,
    /// Records dropped in pass 1.
    pub skipped: Vec<SkippedRecord>,
    /// Ids of nodes whose parent link did not resolve.
    pub orphans: Vec<String>,
    /// Id of the node promoted to root when no root candidate existed.
    pub fallback_root: Option<String>,
}

#[derive(Debug)]
pub struct BuildOutput {
    pub tree: NodeTree,
    pub report: BuildReport,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, records: &[Value], diagnostics: &mut Diagnostics) -> BuildOutput {
        let mut tree = NodeTree::new();
        let mut report = BuildReport::default();
        let mut links: Vec<(NodeId, ParentLink)> = Vec::new();

        // Pass 1: one node per valid record.
        for (index, record) in records.iter().enumerate() {
            match Self::decode_unique(&tree, record) {
                Ok(draft) => {
                    let parent = draft.parent.clone();
                    let handle = tree.insert(Node::from_draft(draft));
                    match parent {
                        ParentLink::Root => tree.push_root(handle),
                        link => links.push((handle, link)),
                    }
                    report.built += 1;
                }
                Err(error) => {
                    diagnostics.warn_record(index, format!("TreeBuilder: skipped record {index}: {error}"));
                    report.skipped.push(SkippedRecord { index, error });
                }
            }
        }

        // Pass 2: parent links, in input order so children keep document order.
        for (child, link) in links {
            let child_id = tree.get(child).map(|n| n.id.clone()).unwrap_or_default();
            let parent = match &link {
                ParentLink::Id(parent_id) => tree.find(parent_id).filter(|&p| p != child),
                _ => None,
            };
            match parent {
                Some(parent) => tree.attach(parent, child),
                None => {
                    diagnostics.info_node(
                        &child_id,
                        format!("TreeBuilder: parent {link} of {child_id} not found; node orphaned"),
                    );
                    report.orphans.push(child_id);
                }
            }
        }

        if tree.roots().is_empty() && !tree.is_empty() {
            Self::promote_fallback_root(&mut tree, &mut report, diagnostics);
        }

        BuildOutput { tree, report }
    }

    fn decode_unique(tree: &NodeTree, record: &Value) -> Result<NodeDraft, RecordError> {
        let draft = decode_record(record)?;
        if tree.find(&draft.id).is_some() {
            return Err(RecordError::DuplicateId(draft.id));
        }
        Ok(draft)
    }

    /// First-inserted node becomes the root. It is cut loose from any parent
    /// so roots never have one and no node is reachable twice.
    fn promote_fallback_root(tree: &mut NodeTree, report: &mut BuildReport, diagnostics: &mut Diagnostics) {
        let first = NodeId(0);
        tree.detach(first);
        tree.push_root(first);

        let Some(node) = tree.get_mut(first) else {
            return;
        };
        let message = format!("no root nodes detected; using first node {} as root", node.id);
        node.warnings.push(message.clone());
        let id = node.id.clone();
        diagnostics.warn_node(&id, format!("TreeBuilder: {message}"));
        report.fallback_root = Some(id);
    }
}

/// Build with a fresh diagnostics context.
pub fn build_tree(records: &[Value]) -> (BuildOutput, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let output = TreeBuilder::new().build(records, &mut diagnostics);
    (output, diagnostics)
}
