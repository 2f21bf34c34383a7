use serde::Serialize;
use serde_json::Value;

use crate::geometry::{Geometry, PositionMode};
use crate::layout::{DerivedLayout, NodeLayout};
use crate::raw::NodeDraft;
use crate::roles::{detect_role, ComponentRole};
use crate::style::NodeStyle;

/// Handle of a node inside its [`NodeTree`](crate::tree::NodeTree) arena.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind-specific payload passed through untouched.
#[derive(Clone, Serialize, Debug, Default, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NodeContent {
    #[default]
    None,
    Text(String),
    VectorPaths(Value),
    Instance { component_id: String },
}

/// One design element.
///
/// Geometry, style and content are fixed at creation. Only `layout`,
/// `derived_layout`, `position_mode` and `warnings` are written afterwards,
/// by the layout classifier.
#[derive(Clone, Serialize, Debug)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub geometry: Geometry,
    pub position_mode: PositionMode,
    pub style: NodeStyle,
    pub content: NodeContent,
    pub layout: NodeLayout,
    pub derived_layout: DerivedLayout,
    pub component_role: ComponentRole,
    pub is_container: bool,
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub(crate) parent: Option<NodeId>,
    #[serde(skip)]
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn from_draft(draft: NodeDraft) -> Self {
        let component_role = detect_role(&draft.name, &draft.kind, draft.style.text.as_ref());
        Self {
            id: draft.id,
            name: draft.name,
            kind: draft.kind,
            geometry: draft.geometry,
            position_mode: draft.position_mode,
            style: draft.style,
            content: draft.content,
            layout: draft.layout,
            derived_layout: DerivedLayout::None,
            component_role,
            is_container: draft.is_container,
            warnings: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_text(&self) -> bool {
        self.kind == "TEXT"
    }

    /// Debug record of this node.
    pub fn summary(&self) -> NodeSummary<'_> {
        NodeSummary {
            id: &self.id,
            name: &self.name,
            kind: &self.kind,
            component_role: self.component_role.as_str(),
            is_container: self.is_container,
            geometry: &self.geometry,
            position_mode: self.position_mode,
            layout: &self.layout,
            properties: &self.derived_layout,
            has_parent: self.parent.is_some(),
            children_count: self.children.len(),
            warnings: &self.warnings,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct NodeSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub component_role: &'a str,
    pub is_container: bool,
    pub geometry: &'a Geometry,
    pub position_mode: PositionMode,
    pub layout: &'a NodeLayout,
    pub properties: &'a DerivedLayout,
    pub has_parent: bool,
    pub children_count: usize,
    #[serde(skip_serializing_if = "no_warnings")]
    pub warnings: &'a [String],
}

fn no_warnings(warnings: &&[String]) -> bool {
    warnings.is_empty()
}

/// Turn a display name into an identifier: `[a-z0-9_-]`, starting with a
/// letter, never empty.
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        // Dropped characters do not end a whitespace run.
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c.to_ascii_lowercase());
            in_space = false;
        }
    }

    match out.chars().next() {
        None => "element".to_string(),
        Some(first) if !first.is_ascii_alphabetic() => format!("el-{out}"),
        Some(_) => out,
    }
}
