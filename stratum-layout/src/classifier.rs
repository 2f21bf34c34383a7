//! Layout classification pass.
//!
//! Visits every reachable node parent-first and writes `layout`,
//! `derived_layout` and, for positioning contexts, `position_mode`. Only a
//! container's direct children are measured; descendants further down are
//! classified when the walk reaches their own parent.

use serde::{Deserialize, Serialize};
use stratum_core::{
    Alignment, AxisAlignment, DerivedLayout, Diagnostics, FlexProps, Geometry, GridProps,
    LayoutType, NodeId, NodeLayout, NodeTree, Padding, PositionMode,
};
use stratum_core::visible_px;

use crate::detect::{self, Axis, GridShape};

/// Behavioural switches for [`LayoutClassifier`]. Detection tolerances are
/// fixed and live in [`crate::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Derive padding from the inset of the children inside the container.
    pub infer_padding: bool,
    /// Warn when a grid's cell count does not match its child count.
    pub flag_irregular_grids: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            infer_padding: true,
            flag_irregular_grids: true,
        }
    }
}

/// Result of a `classify()` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifyReport {
    /// Reachable nodes visited.
    pub visited: usize,
    /// Containers with at least one child.
    pub containers: usize,
    pub rows: usize,
    pub columns: usize,
    pub grids: usize,
    /// Containers where no pattern matched.
    pub free: usize,
    /// Unmatched nodes that kept the auto-layout declared by the source.
    pub declared: usize,
    /// Containers forced to `relative` to contain absolute children.
    pub positioning_contexts: usize,
}

/// What the children of one container look like.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Flow {
        axis: Axis,
        gap: Option<f64>,
        align: Option<AxisAlignment>,
    },
    Grid(GridShape),
    Free,
}

/// Row wins over column, column over grid.
fn detect_shape(children: &[Geometry]) -> Shape {
    for axis in [Axis::Horizontal, Axis::Vertical] {
        if detect::is_aligned(children, axis) {
            return Shape::Flow {
                axis,
                gap: detect::flow_gap(children, axis),
                align: detect::cross_alignment(children, axis),
            };
        }
    }
    match detect::grid_shape(children) {
        Some(grid) => Shape::Grid(grid),
        None => Shape::Free,
    }
}

/// Inset of the children's bounding box inside `own`, clamped at zero.
fn inset_padding(own: &Geometry, children: &[Geometry]) -> Padding {
    let Some(bounds) = detect::bounding_box(children) else {
        return Padding::default();
    };
    Padding {
        top: (bounds.y - own.y).max(0.0),
        right: (own.right() - bounds.right()).max(0.0),
        bottom: (own.bottom() - bounds.bottom()).max(0.0),
        left: (bounds.x - own.x).max(0.0),
    }
}

fn non_zero(padding: Padding) -> Option<Padding> {
    (!padding.is_zero()).then_some(padding)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutClassifier {
    config: ClassifierConfig,
}

impl LayoutClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify every node reachable from the roots. Parents are visited
    /// before their children; orphans are left untouched.
    pub fn classify(&self, tree: &mut NodeTree, diagnostics: &mut Diagnostics) -> ClassifyReport {
        let mut report = ClassifyReport::default();
        for handle in tree.reachable() {
            self.classify_node(tree, handle, diagnostics, &mut report);
        }
        log::debug!(
            "LayoutClassifier: {} nodes, {} rows, {} columns, {} grids, {} free",
            report.visited,
            report.rows,
            report.columns,
            report.grids,
            report.free
        );
        report
    }

    fn classify_node(
        &self,
        tree: &mut NodeTree,
        handle: NodeId,
        diagnostics: &mut Diagnostics,
        report: &mut ClassifyReport,
    ) {
        let Some(node) = tree.get(handle) else {
            return;
        };
        report.visited += 1;

        let children: Vec<_> = tree
            .children(handle)
            .iter()
            .filter_map(|&child| tree.get(child))
            .collect();
        let boxes: Vec<Geometry> = children.iter().map(|c| c.geometry).collect();
        let has_absolute_child = children
            .iter()
            .any(|c| c.position_mode == PositionMode::Absolute);

        let analysed = node.is_container && !boxes.is_empty();
        let shape = if analysed {
            report.containers += 1;
            detect_shape(&boxes)
        } else {
            Shape::Free
        };

        let declared = node.layout;
        let padding = self.padding(&declared, &node.geometry, &boxes);
        let id = node.id.clone();

        let mut warning = None;
        let (layout, derived) = match shape {
            Shape::Flow { axis, gap, align } => {
                match axis {
                    Axis::Horizontal => report.rows += 1,
                    Axis::Vertical => report.columns += 1,
                }
                let direction = axis.direction();
                let mut flex = FlexProps::new(direction.into());
                flex.gap = gap;
                flex.align_items = align;
                flex.padding = non_zero(padding);
                let layout = NodeLayout {
                    kind: LayoutType::AutoLayout,
                    direction: Some(direction),
                    spacing: gap.unwrap_or(0.0),
                    padding,
                    alignment: Alignment {
                        primary: None,
                        counter: align,
                    },
                };
                (layout, DerivedLayout::Flex(flex))
            }
            Shape::Grid(grid) => {
                report.grids += 1;
                if self.config.flag_irregular_grids && grid.is_irregular(boxes.len()) {
                    warning = Some(format!(
                        "grid of {} columns by {} rows holds {} children",
                        grid.columns,
                        grid.rows,
                        boxes.len()
                    ));
                }
                let layout = NodeLayout {
                    kind: LayoutType::Grid,
                    padding,
                    ..NodeLayout::default()
                };
                let props = GridProps {
                    columns: grid.columns,
                    rows: grid.rows,
                    column_gap: grid.column_gap,
                    row_gap: grid.row_gap,
                    padding: non_zero(padding),
                };
                (layout, DerivedLayout::Grid(props))
            }
            Shape::Free => {
                if analysed {
                    report.free += 1;
                }
                let derived = Self::declared_flex(&declared);
                if !derived.is_none() {
                    report.declared += 1;
                }
                (declared, derived)
            }
        };

        log::debug!("LayoutClassifier: {id} -> {:?}", layout.kind);

        let Some(node) = tree.get_mut(handle) else {
            return;
        };
        node.layout = layout;
        node.derived_layout = derived;

        // Absolute children resolve against the nearest positioned ancestor.
        if analysed && has_absolute_child && derived.is_none() {
            node.position_mode = PositionMode::Relative;
            report.positioning_contexts += 1;
        }

        if let Some(message) = warning {
            node.warnings.push(message.clone());
            diagnostics.warn_node(&id, format!("LayoutClassifier: {id}: {message}"));
        }
    }

    /// Declared padding wins; otherwise infer it from the children when
    /// enabled and the container has an area to measure against.
    fn padding(&self, declared: &NodeLayout, own: &Geometry, children: &[Geometry]) -> Padding {
        if !declared.padding.is_zero() {
            return declared.padding;
        }
        if !self.config.infer_padding || !own.has_area() {
            return Padding::default();
        }
        inset_padding(own, children)
    }

    /// Flex properties for a node whose source declared auto-layout.
    fn declared_flex(declared: &NodeLayout) -> DerivedLayout {
        let (LayoutType::AutoLayout, Some(direction)) = (declared.kind, declared.direction) else {
            return DerivedLayout::None;
        };
        let mut flex = FlexProps::new(direction.into());
        flex.gap = visible_px(declared.spacing);
        flex.justify_content = declared.alignment.primary;
        flex.align_items = declared.alignment.counter;
        flex.padding = non_zero(declared.padding);
        DerivedLayout::Flex(flex)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use stratum_core::{build_tree, Direction};

    fn child(id: &str, parent: &str, x: f32, y: f32, w: f32, h: f32) -> Value {
        json!({
            "id": id,
            "type": "RECTANGLE",
            "parent_id": parent,
            "absoluteBoundingBox": { "x": x, "y": y, "width": w, "height": h }
        })
    }

    fn container(id: &str, x: f32, y: f32, w: f32, h: f32) -> Value {
        json!({
            "id": id,
            "type": "FRAME",
            "absoluteBoundingBox": { "x": x, "y": y, "width": w, "height": h }
        })
    }

    fn classify(records: &[Value]) -> (NodeTree, Diagnostics, ClassifyReport) {
        classify_with(records, ClassifierConfig::default())
    }

    fn classify_with(records: &[Value], config: ClassifierConfig) -> (NodeTree, Diagnostics, ClassifyReport) {
        let (out, mut diagnostics) = build_tree(records);
        let mut tree = out.tree;
        let report = LayoutClassifier::new(config).classify(&mut tree, &mut diagnostics);
        (tree, diagnostics, report)
    }

    // ---------------------------------------------------------------
    // Shapes
    // ---------------------------------------------------------------

    #[test]
    fn test_row_with_inferred_padding() {
        let (tree, _, report) = classify(&[
            container("p", -20.0, 90.0, 380.0, 60.0),
            child("a", "p", 0.0, 100.0, 100.0, 40.0),
            child("b", "p", 120.0, 100.0, 100.0, 40.0),
            child("c", "p", 240.0, 100.0, 100.0, 40.0),
        ]);
        let p = tree.find_node("p").unwrap();
        assert_eq!(p.layout.kind, LayoutType::AutoLayout);
        assert_eq!(p.layout.direction, Some(Direction::Horizontal));
        assert_eq!(p.layout.spacing, 20.0);
        assert_eq!(p.layout.alignment.counter, Some(AxisAlignment::FlexStart));
        assert_eq!(p.derived_layout.property("gap").as_deref(), Some("20px"));
        assert_eq!(p.derived_layout.property("padding").as_deref(), Some("10px 20px 10px 20px"));
        assert!(p.layout.agrees_with(&p.derived_layout));
        assert_eq!(report.rows, 1);
        assert_eq!(report.containers, 1);
        assert_eq!(report.visited, 4);
    }

    #[test]
    fn test_padding_inference_can_be_disabled() {
        let config = ClassifierConfig {
            infer_padding: false,
            ..ClassifierConfig::default()
        };
        let (tree, _, _) = classify_with(
            &[
                container("p", -20.0, 90.0, 380.0, 60.0),
                child("a", "p", 0.0, 100.0, 100.0, 40.0),
                child("b", "p", 120.0, 100.0, 100.0, 40.0),
            ],
            config,
        );
        let p = tree.find_node("p").unwrap();
        assert!(p.layout.padding.is_zero());
        assert!(p.derived_layout.property("padding").is_none());
    }

    #[test]
    fn test_column_centered() {
        let (tree, _, report) = classify(&[
            container("p", 0.0, 0.0, 0.0, 0.0),
            child("a", "p", 45.0, 0.0, 110.0, 100.0),
            child("b", "p", 50.0, 150.0, 100.0, 100.0),
            child("c", "p", 55.0, 300.0, 90.0, 100.0),
        ]);
        let p = tree.find_node("p").unwrap();
        assert_eq!(p.layout.direction, Some(Direction::Vertical));
        assert_eq!(p.derived_layout.property("flex-direction").as_deref(), Some("column"));
        assert_eq!(p.derived_layout.property("align-items").as_deref(), Some("center"));
        assert_eq!(p.derived_layout.property("gap").as_deref(), Some("50px"));
        assert_eq!(report.columns, 1);
    }

    #[test]
    fn test_irregular_grid_warns() {
        let (tree, diagnostics, report) = classify(&[
            container("p", 0.0, 0.0, 0.0, 0.0),
            child("a", "p", 0.0, 0.0, 100.0, 100.0),
            child("b", "p", 150.0, 0.0, 100.0, 100.0),
            child("c", "p", 300.0, 0.0, 100.0, 100.0),
            child("d", "p", 0.0, 200.0, 100.0, 100.0),
            child("e", "p", 150.0, 200.0, 100.0, 100.0),
        ]);
        let p = tree.find_node("p").unwrap();
        assert_eq!(p.layout.kind, LayoutType::Grid);
        assert_eq!(p.derived_layout.property("grid-template-columns").as_deref(), Some("repeat(3, 1fr)"));
        assert_eq!(p.warnings.len(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(report.grids, 1);
    }

    #[test]
    fn test_irregular_grid_flag_off() {
        let config = ClassifierConfig {
            flag_irregular_grids: false,
            ..ClassifierConfig::default()
        };
        let (tree, diagnostics, _) = classify_with(
            &[
                container("p", 0.0, 0.0, 0.0, 0.0),
                child("a", "p", 0.0, 0.0, 100.0, 100.0),
                child("b", "p", 150.0, 0.0, 100.0, 100.0),
                child("c", "p", 300.0, 0.0, 100.0, 100.0),
                child("d", "p", 0.0, 200.0, 100.0, 100.0),
                child("e", "p", 150.0, 200.0, 100.0, 100.0),
            ],
            config,
        );
        assert!(tree.find_node("p").unwrap().warnings.is_empty());
        assert!(diagnostics.is_empty());
    }

    // ---------------------------------------------------------------
    // Fallback
    // ---------------------------------------------------------------

    #[test]
    fn test_scattered_children_stay_default() {
        let (tree, _, report) = classify(&[
            container("p", 0.0, 0.0, 500.0, 500.0),
            child("a", "p", 0.0, 0.0, 10.0, 10.0),
            child("b", "p", 200.0, 300.0, 10.0, 10.0),
        ]);
        let p = tree.find_node("p").unwrap();
        assert_eq!(p.layout.kind, LayoutType::Default);
        assert!(p.derived_layout.is_none());
        assert_eq!(report.free, 1);
    }

    #[test]
    fn test_declared_layout_used_in_fallback() {
        let (tree, _, report) = classify(&[json!({
            "id": "p",
            "type": "FRAME",
            "layoutMode": "VERTICAL",
            "itemSpacing": 12,
            "paddingLeft": 8,
            "primaryAxisAlignItems": "SPACE_BETWEEN",
            "counterAxisAlignItems": "CENTER"
        })]);
        let p = tree.find_node("p").unwrap();
        assert_eq!(p.layout.kind, LayoutType::AutoLayout);
        assert!(p.layout.agrees_with(&p.derived_layout));
        assert_eq!(p.derived_layout.property("flex-direction").as_deref(), Some("column"));
        assert_eq!(p.derived_layout.property("gap").as_deref(), Some("12px"));
        assert_eq!(p.derived_layout.property("justify-content").as_deref(), Some("space-between"));
        assert_eq!(p.derived_layout.property("align-items").as_deref(), Some("center"));
        assert_eq!(p.derived_layout.property("padding").as_deref(), Some("0 0 0 8px"));
        assert_eq!(report.declared, 1);
        assert_eq!(report.containers, 0);
    }

    #[test]
    fn test_declared_padding_wins_over_inferred() {
        let (tree, _, _) = classify(&[
            json!({
                "id": "p", "type": "FRAME", "layoutMode": "HORIZONTAL", "paddingTop": 4,
                "absoluteBoundingBox": { "x": 0, "y": 0, "width": 400, "height": 100 }
            }),
            child("a", "p", 20.0, 20.0, 100.0, 40.0),
            child("b", "p", 160.0, 20.0, 100.0, 40.0),
        ]);
        let p = tree.find_node("p").unwrap();
        assert_eq!(p.layout.padding, Padding { top: 4.0, ..Padding::default() });
        assert_eq!(p.derived_layout.property("gap").as_deref(), Some("40px"));
    }

    #[test]
    fn test_leaf_nodes_get_no_layout() {
        let (tree, _, report) = classify(&[
            container("p", 0.0, 0.0, 0.0, 0.0),
            child("a", "p", 0.0, 0.0, 10.0, 10.0),
        ]);
        let a = tree.find_node("a").unwrap();
        assert_eq!(a.layout.kind, LayoutType::Default);
        assert!(a.derived_layout.is_none());
        assert_eq!(report.visited, 2);
        assert_eq!(report.free, 1);
    }

    // ---------------------------------------------------------------
    // Positioning
    // ---------------------------------------------------------------

    #[test]
    fn test_absolute_child_forces_relative() {
        let (tree, _, report) = classify(&[
            json!({ "id": "p", "type": "FRAME", "constraints": { "horizontal": "LEFT_RIGHT", "vertical": "TOP_BOTTOM" } }),
            json!({ "id": "a", "type": "RECTANGLE", "parent_id": "p", "layoutPositioning": "ABSOLUTE" }),
        ]);
        assert_eq!(tree.find_node("p").unwrap().position_mode, PositionMode::Relative);
        assert_eq!(tree.find_node("a").unwrap().position_mode, PositionMode::Absolute);
        assert_eq!(report.positioning_contexts, 1);
    }

    #[test]
    fn test_flow_container_keeps_its_position() {
        let mut records = vec![json!({
            "id": "p", "type": "FRAME",
            "constraints": { "horizontal": "LEFT_RIGHT" }
        })];
        records.push(child("a", "p", 0.0, 0.0, 100.0, 40.0));
        records.push(json!({
            "id": "b", "type": "RECTANGLE", "parent_id": "p", "layoutPositioning": "ABSOLUTE",
            "absoluteBoundingBox": { "x": 120, "y": 0, "width": 100, "height": 40 }
        }));
        let (tree, _, report) = classify(&records);
        let p = tree.find_node("p").unwrap();
        assert!(!p.derived_layout.is_none());
        assert_eq!(p.position_mode, PositionMode::Absolute);
        assert_eq!(report.positioning_contexts, 0);
    }

    #[test]
    fn test_orphans_not_classified() {
        let (tree, _, report) = classify(&[
            container("p", 0.0, 0.0, 0.0, 0.0),
            json!({ "id": "lost", "type": "FRAME", "parent_id": "ghost", "layoutMode": "HORIZONTAL" }),
        ]);
        assert!(tree.find_node("lost").unwrap().derived_layout.is_none());
        assert_eq!(report.visited, 1);
    }

    #[test]
    fn test_config_from_json() {
        let config: ClassifierConfig = serde_json::from_value(json!({ "infer_padding": false })).unwrap();
        assert!(!config.infer_padding);
        assert!(config.flag_irregular_grids);
    }
}
