//! # stratum-layout: layout inference for design trees
//!
//! Reads the absolute geometry of each container's children and decides
//! whether they form a row, a column, a grid or nothing in particular. The
//! result is written back into the [`NodeTree`] as a [`NodeLayout`]
//! descriptor plus the [`DerivedLayout`] properties an emitter turns into
//! CSS.
//!
//! ```text
//!  records ──TreeBuilder──▸ NodeTree ──LayoutClassifier──▸ classified tree
//!                                                  │
//!                                   LayoutPreview (taffy) ──▸ drift
//! ```
//!
//! [`NodeLayout`]: stratum_core::NodeLayout
//! [`DerivedLayout`]: stratum_core::DerivedLayout

pub mod classifier;
pub mod detect;
pub mod preview;

use serde_json::Value;
use stratum_core::{BuildReport, Diagnostics, NodeTree, TreeBuilder};

pub use classifier::{ClassifierConfig, ClassifyReport, LayoutClassifier};
pub use preview::{preview, LayoutPreview, PreviewBox, PreviewError};

/// Everything one `infer()` call produced.
#[derive(Debug)]
pub struct Inference {
    pub tree: NodeTree,
    pub diagnostics: Diagnostics,
    pub build: BuildReport,
    pub classify: ClassifyReport,
}

/// Build a tree from flat records and classify it.
///
/// Never fails: bad records, dangling parents and a missing root are
/// recorded in `diagnostics` and the reports. An empty input yields an empty
/// tree.
pub fn infer(records: &[Value], config: &ClassifierConfig) -> Inference {
    let mut diagnostics = Diagnostics::new();
    let output = TreeBuilder::new().build(records, &mut diagnostics);
    let mut tree = output.tree;
    let classify = LayoutClassifier::new(*config).classify(&mut tree, &mut diagnostics);
    Inference {
        tree,
        diagnostics,
        build: output.report,
        classify,
    }
}
