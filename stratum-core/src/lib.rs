//! # stratum-core: node model for design-to-code inference
//!
//! Raw design-tool records (flat JSON objects with `parent_id` links) become
//! a [`NodeTree`]: an arena of [`Node`]s carrying geometry, style, a semantic
//! [`ComponentRole`] and layout fields that `stratum-layout` fills in.
//!
//! ```text
//!  document ──flatten──▸ records ──TreeBuilder──▸ NodeTree ──▸ (classifier)
//!                                       │
//!                                  Diagnostics
//! ```

pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod flatten;
pub mod geometry;
pub mod layout;
pub mod node;
pub mod raw;
pub mod roles;
pub mod style;
pub mod tokens;
pub mod tree;

pub use builder::{build_tree, BuildOutput, BuildReport, SkippedRecord, TreeBuilder};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::RecordError;
pub use flatten::{flatten_document, flatten_documents};
pub use geometry::{Geometry, PositionMode, Sizing};
pub use layout::{
    format_px, visible_px, Alignment, AxisAlignment, DerivedLayout, Direction, FlexDirection,
    FlexProps, GridProps, LayoutType, NodeLayout, Padding,
};
pub use node::{sanitize_name, Node, NodeContent, NodeId, NodeSummary};
pub use raw::ParentLink;
pub use roles::{detect_role, ComponentRole};
pub use style::{Color, CornerRadius, Fill, NodeStyle, Shadow, Stroke, TextStyle};
pub use tokens::DesignTokens;
pub use tree::NodeTree;
