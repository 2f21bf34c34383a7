//! Decoding of raw design-tool records.
//!
//! Records arrive as loose JSON objects. They are read through `Deserialize`
//! shadow structs with every field defaulted, so only a genuinely wrong shape
//! (a string where a box belongs, say) fails. Paint, dash and effect lists
//! are read leniently: a non-list counts as empty and entries that do not
//! decode are dropped. Unknown paint and effect types deserialize to an
//! `Other` variant and are dropped too.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::RecordError;
use crate::geometry::{Geometry, PositionMode, Sizing};
use crate::layout::{Alignment, AxisAlignment, Direction, NodeLayout, Padding};
use crate::node::{sanitize_name, NodeContent};
use crate::style::{
    Color, CornerRadius, Fill, FontStyle, GradientKind, NodeStyle, Shadow, Stroke, StrokeAlign,
    StrokeStyle, TextStyle,
};

/// Kinds that always own children.
pub const CONTAINER_KINDS: &[&str] = &["FRAME", "GROUP", "COMPONENT", "INSTANCE"];

// ---------------------------------------------------------------
// Shadow structs
// ---------------------------------------------------------------

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RawBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RawConstraints {
    horizontal: Option<String>,
    vertical: Option<String>,
    width: Option<String>,
    height: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct RawColor {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Default for RawColor {
    fn default() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
    }
}

impl RawColor {
    fn with_opacity(&self, opacity: f64) -> Color {
        Color::from_unit(self.r, self.g, self.b, opacity * self.a)
    }
}

/// A list field that never fails the record.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum RawPaint {
    #[serde(rename_all = "camelCase")]
    Solid {
        #[serde(default = "default_true")]
        visible: bool,
        #[serde(default)]
        color: RawColor,
        #[serde(default = "default_one")]
        opacity: f64,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(default = "default_true")]
        visible: bool,
        #[serde(default)]
        image_ref: String,
    },
    GradientLinear(RawGradient),
    GradientRadial(RawGradient),
    GradientAngular(RawGradient),
    GradientDiamond(RawGradient),
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawGradient {
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    gradient_handle_positions: Value,
    #[serde(default)]
    gradient_stops: Value,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum RawEffect {
    DropShadow(RawShadow),
    InnerShadow(RawShadow),
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug)]
struct RawShadow {
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    color: RawColor,
    #[serde(default = "default_one")]
    opacity: f64,
    #[serde(default)]
    offset: RawOffset,
    #[serde(default)]
    radius: f32,
    #[serde(default)]
    spread: f32,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RawOffset {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawTypeStyle {
    font_family: Option<String>,
    font_size: Option<f32>,
    font_weight: Option<f32>,
    text_align_horizontal: Option<String>,
    italic: bool,
    text_decoration: Option<String>,
    line_height_px: Option<f32>,
    letter_spacing: f32,
}

/// The fields of a record this crate understands.
#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawRecord {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    absolute_bounding_box: Option<RawBox>,
    constraints: RawConstraints,
    layout_positioning: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    fills: Vec<RawPaint>,
    #[serde(deserialize_with = "lenient_list")]
    strokes: Vec<RawPaint>,
    stroke_weight: Option<f32>,
    stroke_align: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    stroke_dashes: Vec<f32>,
    #[serde(deserialize_with = "lenient_list")]
    effects: Vec<RawEffect>,
    corner_radius: Option<f32>,
    rectangle_corner_radii: Option<Vec<f32>>,
    opacity: Option<f32>,
    visible: Option<bool>,
    characters: Option<String>,
    style: Option<RawTypeStyle>,
    vector_paths: Option<Value>,
    component_id: Option<String>,
    layout_mode: Option<String>,
    item_spacing: f64,
    padding_top: f64,
    padding_right: f64,
    padding_bottom: f64,
    padding_left: f64,
    primary_axis_align_items: Option<String>,
    counter_axis_align_items: Option<String>,
}

// ---------------------------------------------------------------
// Decoded draft
// ---------------------------------------------------------------

/// Where a record says it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLink {
    /// No `parent_id`, or `null`: a root candidate.
    Root,
    Id(String),
    /// A `parent_id` no identifier can match, kept as written.
    Unusable(String),
}

impl fmt::Display for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentLink::Root => f.write_str("(none)"),
            ParentLink::Id(id) => f.write_str(id),
            ParentLink::Unusable(raw) => f.write_str(raw),
        }
    }
}

/// Everything needed to create a node, before it is placed in a tree.
#[derive(Debug, Clone)]
pub struct NodeDraft {
    pub id: String,
    pub parent: ParentLink,
    pub raw_name: String,
    pub name: String,
    pub kind: String,
    pub geometry: Geometry,
    pub position_mode: PositionMode,
    pub style: NodeStyle,
    pub content: NodeContent,
    pub layout: NodeLayout,
    pub is_container: bool,
}

/// Identifiers may be strings or integers; anything else is unusable.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode one raw record.
pub fn decode_record(value: &Value) -> Result<NodeDraft, RecordError> {
    let object = value.as_object().ok_or(RecordError::NotAnObject)?;
    let id = identifier(object.get("id")).ok_or(RecordError::MissingId)?;
    let parent = match object.get("parent_id") {
        None | Some(Value::Null) => ParentLink::Root,
        Some(other) => match identifier(Some(other)) {
            Some(parent_id) => ParentLink::Id(parent_id),
            None => ParentLink::Unusable(other.to_string()),
        },
    };

    let raw: RawRecord =
        RawRecord::deserialize(value).map_err(|source| RecordError::Malformed {
            id: id.clone(),
            reason: source.to_string(),
        })?;
    let raw_name = raw.name.clone().unwrap_or_default();
    let kind = raw.kind.clone().unwrap_or_default();

    let is_container =
        CONTAINER_KINDS.contains(&kind.as_str()) || object.contains_key("children");

    Ok(NodeDraft {
        name: sanitize_name(&raw_name),
        geometry: geometry(&raw),
        position_mode: position_mode(&raw),
        style: style(&raw, &kind),
        content: content(&raw, &kind),
        layout: declared_layout(&raw),
        raw_name,
        kind,
        is_container,
        id,
        parent,
    })
}

fn geometry(raw: &RawRecord) -> Geometry {
    let bbox = raw.absolute_bounding_box.as_ref();
    let sizing = |flag: &Option<String>| match flag.as_deref() {
        Some("FIXED") => Sizing::Fixed,
        _ => Sizing::Flexible,
    };
    Geometry {
        x: bbox.map_or(0.0, |b| b.x),
        y: bbox.map_or(0.0, |b| b.y),
        width: bbox.map_or(0.0, |b| b.width),
        height: bbox.map_or(0.0, |b| b.height),
        width_sizing: sizing(&raw.constraints.width),
        height_sizing: sizing(&raw.constraints.height),
    }
}

fn position_mode(raw: &RawRecord) -> PositionMode {
    let stretched = raw.constraints.horizontal.as_deref() == Some("LEFT_RIGHT")
        || raw.constraints.vertical.as_deref() == Some("TOP_BOTTOM");
    if stretched || raw.layout_positioning.as_deref() == Some("ABSOLUTE") {
        PositionMode::Absolute
    } else {
        PositionMode::Relative
    }
}

fn style(raw: &RawRecord, kind: &str) -> NodeStyle {
    let fills = raw.fills.iter().filter_map(fill).collect();

    let stroke_style = if raw.stroke_dashes.is_empty() {
        StrokeStyle::Solid
    } else {
        StrokeStyle::Dashed
    };
    let strokes = raw
        .strokes
        .iter()
        .filter_map(|paint| match paint {
            RawPaint::Solid { visible: true, color, opacity } => Some(Stroke {
                color: color.with_opacity(*opacity),
                weight: raw.stroke_weight.unwrap_or(1.0),
                align: StrokeAlign::parse(raw.stroke_align.as_deref().unwrap_or("INSIDE")),
                style: stroke_style,
            }),
            _ => None,
        })
        .collect();

    let shadows = raw
        .effects
        .iter()
        .filter_map(|effect| match effect {
            RawEffect::DropShadow(s) if s.visible => Some(shadow(s, false)),
            RawEffect::InnerShadow(s) if s.visible => Some(shadow(s, true)),
            _ => None,
        })
        .collect();

    let text = if kind == "TEXT" {
        raw.style.as_ref().map(|s| text_style(raw, s))
    } else {
        None
    };

    NodeStyle {
        fills,
        strokes,
        shadows,
        radius: radius(raw),
        opacity: raw.opacity.unwrap_or(1.0),
        visible: raw.visible.unwrap_or(true),
        text,
    }
}

fn fill(paint: &RawPaint) -> Option<Fill> {
    let gradient = |kind: GradientKind, g: &RawGradient| {
        g.visible.then(|| Fill::Gradient {
            gradient: kind,
            handle_positions: g.gradient_handle_positions.clone(),
            stops: g.gradient_stops.clone(),
        })
    };
    match paint {
        RawPaint::Solid { visible, color, opacity } => visible.then(|| Fill::Color {
            color: color.with_opacity(*opacity),
        }),
        RawPaint::Image { visible, image_ref } => visible.then(|| Fill::Image {
            image_ref: image_ref.clone(),
        }),
        RawPaint::GradientLinear(g) => gradient(GradientKind::Linear, g),
        RawPaint::GradientRadial(g) => gradient(GradientKind::Radial, g),
        RawPaint::GradientAngular(g) => gradient(GradientKind::Angular, g),
        RawPaint::GradientDiamond(g) => gradient(GradientKind::Diamond, g),
        RawPaint::Other => None,
    }
}

fn shadow(raw: &RawShadow, inset: bool) -> Shadow {
    Shadow {
        color: raw.color.with_opacity(raw.opacity),
        offset_x: raw.offset.x,
        offset_y: raw.offset.y,
        radius: raw.radius,
        spread: raw.spread,
        inset,
    }
}

fn radius(raw: &RawRecord) -> CornerRadius {
    if let Some(r) = raw.corner_radius {
        return CornerRadius::Uniform(r);
    }
    match raw.rectangle_corner_radii.as_deref() {
        Some(&[top_left, top_right, bottom_right, bottom_left]) => CornerRadius::PerCorner {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        },
        _ => CornerRadius::default(),
    }
}

fn text_style(raw: &RawRecord, s: &RawTypeStyle) -> TextStyle {
    let defaults = TextStyle::default();
    TextStyle {
        content: raw.characters.clone().unwrap_or_default(),
        font_family: s.font_family.clone().unwrap_or(defaults.font_family),
        font_size: s.font_size.unwrap_or(defaults.font_size),
        font_weight: s.font_weight.unwrap_or(defaults.font_weight),
        text_align: s
            .text_align_horizontal
            .as_deref()
            .map_or(defaults.text_align, str::to_lowercase),
        font_style: if s.italic { FontStyle::Italic } else { FontStyle::Normal },
        text_decoration: s
            .text_decoration
            .as_deref()
            .map_or(defaults.text_decoration, str::to_lowercase),
        line_height: s.line_height_px,
        letter_spacing: s.letter_spacing,
    }
}

fn content(raw: &RawRecord, kind: &str) -> NodeContent {
    match kind {
        "TEXT" => NodeContent::Text(raw.characters.clone().unwrap_or_default()),
        "VECTOR" => NodeContent::VectorPaths(raw.vector_paths.clone().unwrap_or(Value::Null)),
        "INSTANCE" => NodeContent::Instance {
            component_id: raw.component_id.clone().unwrap_or_default(),
        },
        _ => NodeContent::None,
    }
}

fn declared_layout(raw: &RawRecord) -> NodeLayout {
    let Some(direction) = raw.layout_mode.as_deref().and_then(Direction::parse) else {
        return NodeLayout::default();
    };
    NodeLayout::declared(
        direction,
        raw.item_spacing,
        Padding {
            top: raw.padding_top,
            right: raw.padding_right,
            bottom: raw.padding_bottom,
            left: raw.padding_left,
        },
        Alignment {
            primary: raw.primary_axis_align_items.as_deref().and_then(AxisAlignment::parse),
            counter: raw.counter_axis_align_items.as_deref().and_then(AxisAlignment::parse),
        },
    )
}
