use rustc_hash::FxHashMap;
use stratum_core::{
    AxisAlignment, DerivedLayout, FlexDirection as InferredDirection, Node, NodeId, NodeTree,
    Padding, PositionMode,
};
use taffy::prelude::*;
use taffy::{Layout, Style, TaffyError, TaffyTree};
use thiserror::Error;

type SolverNode = taffy::NodeId;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Taffy error: {0}")]
    Taffy(#[from] TaffyError),
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),
}

/// Where the solver put a node, next to where the design put it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewBox {
    /// Solver position relative to the parent.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Distance between the solver position and the source position, both
    /// relative to the parent.
    pub drift: f32,
}

/// Replays a classified subtree through Taffy.
///
/// Every node keeps its source size. Containers get the flex or grid style
/// inferred for them; free containers lay their children out with absolute
/// insets. If the inference is right, every child lands where the design
/// put it and drift stays near zero.
pub struct LayoutPreview {
    /// Taffy 0.9 tree
    taffy: TaffyTree,

    root: SolverNode,

    /// Mapping from arena handles to solver nodes
    node_to_solver: FxHashMap<NodeId, SolverNode>,

    /// Source offset of each node from its parent
    expected: FxHashMap<NodeId, (f32, f32)>,

    /// Computed boxes, filled by `compute()`
    results: FxHashMap<NodeId, PreviewBox>,
}

impl LayoutPreview {
    /// Mirror the subtree under `root` into a fresh solver tree.
    pub fn build(tree: &NodeTree, root: NodeId) -> Result<Self, PreviewError> {
        let root_node = tree.get(root).ok_or(PreviewError::NodeNotFound(root))?;

        let mut taffy = TaffyTree::new();
        let mut node_to_solver = FxHashMap::default();
        let mut expected = FxHashMap::default();

        let solver_root = taffy.new_leaf(Self::container_style(root_node, Position::Relative))?;
        node_to_solver.insert(root, solver_root);
        expected.insert(root, (0.0, 0.0));

        // Pre-order: a parent is always mirrored before its children.
        for handle in tree.descendants(root).into_iter().skip(1) {
            let Some(parent) = tree.parent(handle) else {
                continue;
            };
            let (Some(node), Some(parent_node)) = (tree.get(handle), tree.get(parent)) else {
                continue;
            };
            let parent_solver = *node_to_solver
                .get(&parent)
                .ok_or(PreviewError::NodeNotFound(parent))?;

            let offset = (
                (node.geometry.x - parent_node.geometry.x) as f32,
                (node.geometry.y - parent_node.geometry.y) as f32,
            );
            let style = Self::child_style(node, parent_node, offset);
            let solver = taffy.new_leaf(style)?;
            taffy.add_child(parent_solver, solver)?;

            node_to_solver.insert(handle, solver);
            expected.insert(handle, offset);
        }

        Ok(Self {
            taffy,
            root: solver_root,
            node_to_solver,
            expected,
            results: FxHashMap::default(),
        })
    }

    // ---------------------------------------------------------------
    // Style helpers
    // ---------------------------------------------------------------

    fn length_or_auto(value: f64) -> Dimension {
        if value > 0.0 {
            Dimension::length(value as f32)
        } else {
            Dimension::auto()
        }
    }

    fn padding_rect(padding: Option<Padding>) -> taffy::Rect<LengthPercentage> {
        let p = padding.unwrap_or_default();
        taffy::Rect {
            left: LengthPercentage::length(p.left as f32),
            right: LengthPercentage::length(p.right as f32),
            top: LengthPercentage::length(p.top as f32),
            bottom: LengthPercentage::length(p.bottom as f32),
        }
    }

    fn align_items(alignment: Option<AxisAlignment>) -> Option<AlignItems> {
        match alignment? {
            AxisAlignment::FlexStart => Some(AlignItems::FlexStart),
            AxisAlignment::FlexEnd => Some(AlignItems::FlexEnd),
            AxisAlignment::Center => Some(AlignItems::Center),
            AxisAlignment::Baseline => Some(AlignItems::Baseline),
            // Items keep their own cross positions; the solver cannot spread them.
            AxisAlignment::SpaceBetween => None,
        }
    }

    fn justify_content(alignment: Option<AxisAlignment>) -> Option<JustifyContent> {
        match alignment? {
            AxisAlignment::FlexStart => Some(JustifyContent::FlexStart),
            AxisAlignment::FlexEnd => Some(JustifyContent::FlexEnd),
            AxisAlignment::Center => Some(JustifyContent::Center),
            AxisAlignment::SpaceBetween => Some(JustifyContent::SpaceBetween),
            AxisAlignment::Baseline => None,
        }
    }

    /// Style of a node as a container, before it is placed in its parent.
    fn container_style(node: &Node, position: Position) -> Style {
        let size = Size {
            width: Self::length_or_auto(node.geometry.width),
            height: Self::length_or_auto(node.geometry.height),
        };
        match &node.derived_layout {
            DerivedLayout::None => Style {
                display: Display::Block,
                position,
                size,
                ..Style::default()
            },
            DerivedLayout::Flex(flex) => {
                let gap = flex.gap.unwrap_or(0.0) as f32;
                Style {
                    display: Display::Flex,
                    position,
                    size,
                    flex_direction: match flex.direction {
                        InferredDirection::Row => FlexDirection::Row,
                        InferredDirection::Column => FlexDirection::Column,
                    },
                    gap: Size {
                        width: LengthPercentage::length(gap),
                        height: LengthPercentage::length(gap),
                    },
                    align_items: Self::align_items(flex.align_items),
                    justify_content: Self::justify_content(flex.justify_content),
                    padding: Self::padding_rect(flex.padding),
                    ..Style::default()
                }
            }
            DerivedLayout::Grid(grid) => Style {
                display: Display::Grid,
                position,
                size,
                grid_template_columns: vec![fr(1.0); grid.columns],
                gap: Size {
                    width: LengthPercentage::length(grid.column_gap.unwrap_or(0.0) as f32),
                    height: LengthPercentage::length(grid.row_gap.unwrap_or(0.0) as f32),
                },
                padding: Self::padding_rect(grid.padding),
                ..Style::default()
            },
        }
    }

    /// Style of `node` inside `parent`. Children of free containers and
    /// absolute children are taken out of flow and pinned at their offset.
    fn child_style(node: &Node, parent: &Node, offset: (f32, f32)) -> Style {
        let out_of_flow =
            parent.derived_layout.is_none() || node.position_mode == PositionMode::Absolute;
        if !out_of_flow {
            return Style {
                flex_shrink: 0.0,
                ..Self::container_style(node, Position::Relative)
            };
        }
        Style {
            inset: taffy::Rect {
                left: LengthPercentageAuto::length(offset.0),
                top: LengthPercentageAuto::length(offset.1),
                right: LengthPercentageAuto::auto(),
                bottom: LengthPercentageAuto::auto(),
            },
            ..Self::container_style(node, Position::Absolute)
        }
    }

    // ---------------------------------------------------------------
    // Layout computation
    // ---------------------------------------------------------------

    /// Run the solver and refresh the result cache for every mirrored node.
    pub fn compute(&mut self) -> Result<(), PreviewError> {
        self.taffy.compute_layout(self.root, Size::MAX_CONTENT)?;

        self.results.clear();
        for (&handle, &solver) in &self.node_to_solver {
            let layout: &Layout = self.taffy.layout(solver)?;
            let (ex, ey) = self.expected.get(&handle).copied().unwrap_or_default();
            let (x, y) = if solver == self.root {
                (ex, ey)
            } else {
                (layout.location.x, layout.location.y)
            };
            self.results.insert(
                handle,
                PreviewBox {
                    x,
                    y,
                    width: layout.size.width,
                    height: layout.size.height,
                    drift: (x - ex).hypot(y - ey),
                },
            );
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn get(&self, handle: NodeId) -> Option<&PreviewBox> {
        self.results.get(&handle)
    }

    /// Largest drift over the subtree, `0` before `compute()`.
    pub fn max_drift(&self) -> f32 {
        self.results.values().map(|b| b.drift).fold(0.0, f32::max)
    }

    /// Number of nodes mirrored into the solver.
    pub fn node_count(&self) -> usize {
        self.node_to_solver.len()
    }
}

/// Build and compute a preview of the subtree under `root`.
pub fn preview(tree: &NodeTree, root: NodeId) -> Result<LayoutPreview, PreviewError> {
    let mut preview = LayoutPreview::build(tree, root)?;
    preview.compute()?;
    Ok(preview)
}

// ===================================================================
// Tests
// ===================================================================
