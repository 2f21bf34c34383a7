//! End-to-end tests: flat records in, classified tree out.

use serde_json::{json, Value};
use stratum_core::{
    flatten_document, sanitize_name, ComponentRole, Direction, LayoutType, PositionMode,
    RecordError,
};
use stratum_layout::{infer, preview, ClassifierConfig, Inference};

fn frame(id: &str) -> Value {
    json!({ "id": id, "type": "FRAME", "name": id })
}

fn rect(id: &str, parent: &str, x: f32, y: f32, w: f32, h: f32) -> Value {
    json!({
        "id": id,
        "type": "RECTANGLE",
        "parent_id": parent,
        "absoluteBoundingBox": { "x": x, "y": y, "width": w, "height": h }
    })
}

fn run(records: &[Value]) -> Inference {
    infer(records, &ClassifierConfig::default())
}

#[test]
fn test_sanitization_is_idempotent() {
    for raw in ["Submit Button", "Card / Header (v2)", "  ", "42 items", "Ünïcode"] {
        let once = sanitize_name(raw);
        assert_eq!(sanitize_name(&once), once);
    }
}

#[test]
fn test_row_detection() {
    let result = run(&[
        frame("row"),
        rect("a", "row", 0.0, 100.0, 100.0, 40.0),
        rect("b", "row", 120.0, 102.0, 100.0, 40.0),
        rect("c", "row", 240.0, 99.0, 100.0, 40.0),
    ]);
    let row = result.tree.find_node("row").unwrap();
    assert_eq!(row.layout.kind, LayoutType::AutoLayout);
    assert_eq!(row.layout.direction, Some(Direction::Horizontal));
    assert!((row.layout.spacing - 20.0).abs() < 1e-3);
    assert_eq!(row.derived_layout.property("display").as_deref(), Some("flex"));
    assert_eq!(row.derived_layout.property("flex-direction").as_deref(), Some("row"));
    assert_eq!(row.derived_layout.property("gap").as_deref(), Some("20px"));
    assert!(row.layout.agrees_with(&row.derived_layout));
}

#[test]
fn test_column_detection() {
    let result = run(&[
        frame("col"),
        rect("a", "col", 50.0, 0.0, 100.0, 100.0),
        rect("b", "col", 52.0, 150.0, 100.0, 100.0),
        rect("c", "col", 48.0, 300.0, 100.0, 100.0),
    ]);
    let col = result.tree.find_node("col").unwrap();
    assert_eq!(col.layout.direction, Some(Direction::Vertical));
    assert_eq!(col.derived_layout.property("flex-direction").as_deref(), Some("column"));
    assert_eq!(result.classify.columns, 1);
}

#[test]
fn test_grid_detection() {
    let mut records = vec![frame("grid")];
    for (i, &(x, y)) in [(0.0, 0.0), (150.0, 0.0), (300.0, 0.0), (0.0, 200.0), (150.0, 200.0), (300.0, 200.0)]
        .iter()
        .enumerate()
    {
        records.push(rect(&format!("cell{i}"), "grid", x, y, 100.0, 150.0));
    }
    let result = run(&records);
    let grid = result.tree.find_node("grid").unwrap();
    assert_eq!(grid.layout.kind, LayoutType::Grid);
    assert_eq!(grid.derived_layout.property("grid-template-columns").as_deref(), Some("repeat(3, 1fr)"));
    assert_eq!(grid.derived_layout.property("grid-template-rows").as_deref(), Some("repeat(2, auto)"));
    assert_eq!(grid.derived_layout.property("column-gap").as_deref(), Some("50px"));
    assert_eq!(grid.derived_layout.property("row-gap").as_deref(), Some("50px"));
    assert!(grid.warnings.is_empty());
}

#[test]
fn test_single_child_falls_back() {
    let result = run(&[frame("solo"), rect("a", "solo", 10.0, 10.0, 100.0, 100.0)]);
    let solo = result.tree.find_node("solo").unwrap();
    assert_eq!(solo.layout.kind, LayoutType::Default);
    assert!(solo.derived_layout.is_none());
    assert!(solo.derived_layout.properties().is_empty());
}

#[test]
fn test_overlapping_children_have_no_gap() {
    let result = run(&[
        frame("stack"),
        rect("a", "stack", 0.0, 0.0, 100.0, 40.0),
        rect("b", "stack", 60.0, 0.0, 100.0, 40.0),
        rect("c", "stack", 120.0, 0.0, 100.0, 40.0),
    ]);
    let stack = result.tree.find_node("stack").unwrap();
    assert_eq!(stack.layout.direction, Some(Direction::Horizontal));
    assert_eq!(stack.layout.spacing, 0.0);
    assert!(stack.derived_layout.property("gap").is_none());
}

#[test]
fn test_orphan_is_tolerated() {
    let result = run(&[
        frame("root"),
        rect("a", "root", 0.0, 0.0, 10.0, 10.0),
        rect("lost", "nowhere", 0.0, 0.0, 10.0, 10.0),
    ]);
    let tree = &result.tree;
    assert_eq!(tree.roots().len(), 1);
    let lost = tree.find("lost").unwrap();
    assert!(!tree.descendants(tree.roots()[0]).contains(&lost));
    assert_eq!(result.build.orphans, vec!["lost".to_string()]);
}

#[test]
fn test_root_fallback() {
    let result = run(&[
        json!({ "id": "a", "type": "FRAME", "parent_id": "x" }),
        json!({ "id": "b", "type": "FRAME", "parent_id": "y" }),
    ]);
    let tree = &result.tree;
    assert_eq!(tree.roots().len(), 1);
    let root = tree.get(tree.roots()[0]).unwrap();
    assert_eq!(root.id, "a");
    assert!(!root.warnings.is_empty());
    assert!(result.diagnostics.warning_count() >= 1);
    assert_eq!(result.build.fallback_root.as_deref(), Some("a"));
}

#[test]
fn test_role_priority() {
    let result = run(&[json!({ "id": "1", "type": "FRAME", "name": "Submit Button Card" })]);
    let node = result.tree.find_node("1").unwrap();
    assert_eq!(node.component_role, ComponentRole::Button);
    assert_eq!(node.component_role.as_str(), "button");
}

#[test]
fn test_absolute_child_makes_container_relative() {
    let result = run(&[
        json!({ "id": "box", "type": "FRAME", "constraints": { "horizontal": "LEFT_RIGHT" } }),
        json!({ "id": "badge", "type": "ELLIPSE", "parent_id": "box", "layoutPositioning": "ABSOLUTE" }),
    ]);
    let container = result.tree.find_node("box").unwrap();
    assert!(container.derived_layout.is_none());
    assert_eq!(container.position_mode, PositionMode::Relative);
}

// ---------------------------------------------------------------
// Whole pipeline
// ---------------------------------------------------------------

#[test]
fn test_empty_input() {
    let result = run(&[]);
    assert!(result.tree.is_empty());
    assert!(result.tree.roots().is_empty());
    assert_eq!(result.classify.visited, 0);
}

#[test]
fn test_bad_records_reported_not_fatal() {
    let result = run(&[
        frame("root"),
        json!({ "name": "no id" }),
        json!([1, 2, 3]),
        rect("a", "root", 0.0, 0.0, 10.0, 10.0),
    ]);
    assert_eq!(result.build.built, 2);
    let errors: Vec<_> = result.build.skipped.iter().map(|s| s.error.clone()).collect();
    assert_eq!(errors, vec![RecordError::MissingId, RecordError::NotAnObject]);
    assert_eq!(result.diagnostics.warning_count(), 2);
}

#[test]
fn test_nested_document_round_trip() {
    let document = json!({
        "id": "page", "type": "FRAME", "name": "Login Page",
        "absoluteBoundingBox": { "x": 0, "y": 0, "width": 400, "height": 300 },
        "children": [
            {
                "id": "form", "type": "FRAME", "name": "Form",
                "absoluteBoundingBox": { "x": 20, "y": 20, "width": 360, "height": 260 },
                "children": [
                    { "id": "title", "type": "TEXT", "name": "Title", "characters": "Sign in",
                      "style": { "fontSize": 28, "fontWeight": 700 },
                      "absoluteBoundingBox": { "x": 40, "y": 40, "width": 200, "height": 40 } },
                    { "id": "email", "type": "INSTANCE", "name": "Email Input",
                      "absoluteBoundingBox": { "x": 40, "y": 100, "width": 320, "height": 40 } },
                    { "id": "go", "type": "INSTANCE", "name": "Submit Button",
                      "absoluteBoundingBox": { "x": 40, "y": 160, "width": 120, "height": 40 } }
                ]
            }
        ]
    });
    let result = run(&flatten_document(&document));
    let tree = &result.tree;

    let form = tree.find_node("form").unwrap();
    assert_eq!(form.layout.direction, Some(Direction::Vertical));
    assert_eq!(form.derived_layout.property("gap").as_deref(), Some("20px"));
    assert_eq!(form.derived_layout.property("align-items").as_deref(), Some("flex-start"));
    assert_eq!(form.derived_layout.property("padding").as_deref(), Some("20px 20px 80px 20px"));

    assert_eq!(tree.find_node("title").unwrap().component_role, ComponentRole::Heading(1));
    assert_eq!(tree.find_node("email").unwrap().component_role, ComponentRole::FormField);
    assert_eq!(tree.find_node("go").unwrap().component_role, ComponentRole::Button);

    // The page has a single child, so it stays a plain block.
    assert!(tree.find_node("page").unwrap().derived_layout.is_none());

    let preview = preview(tree, tree.roots()[0]).unwrap();
    assert!(preview.max_drift() < 0.01, "drift {}", preview.max_drift());
}

#[test]
fn test_every_node_layout_consistent() {
    let result = run(&[
        frame("root"),
        rect("a", "root", 0.0, 0.0, 50.0, 50.0),
        rect("b", "root", 100.0, 0.0, 50.0, 50.0),
        json!({ "id": "inner", "type": "GROUP", "parent_id": "root" }),
        rect("c", "inner", 10.0, 10.0, 10.0, 10.0),
    ]);
    for (_, node) in result.tree.iter() {
        assert!(node.layout.agrees_with(&node.derived_layout), "{}", node.id);
    }
}

#[test]
fn test_emitted_json_carries_css_properties() {
    let result = run(&[
        frame("page"),
        json!({ "id": "row", "type": "FRAME", "parent_id": "page",
                "absoluteBoundingBox": { "x": 0, "y": 0, "width": 220, "height": 40 } }),
        rect("a", "row", 0.0, 0.0, 100.0, 40.0),
        rect("b", "row", 120.0, 0.0, 100.0, 40.0),
        json!({ "id": "free", "type": "FRAME", "parent_id": "page",
                "absoluteBoundingBox": { "x": 0, "y": 100, "width": 500, "height": 500 } }),
        rect("c", "free", 30.0, 140.0, 10.0, 10.0),
        rect("d", "free", 300.0, 400.0, 10.0, 10.0),
    ]);
    let json = result.tree.to_json();
    let page = &json[0];
    let row = &page["children"][0];
    let free = &page["children"][1];

    assert_eq!(row["derived_layout"]["display"], "flex");
    assert_eq!(row["derived_layout"]["flex-direction"], "row");
    assert_eq!(row["derived_layout"]["gap"], "20px");
    assert_eq!(free["derived_layout"], json!({}));
    assert_eq!(free["children"][0]["derived_layout"], json!({}));
}
