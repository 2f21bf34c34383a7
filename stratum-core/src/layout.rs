//! Structural layout descriptors.
//!
//! [`NodeLayout`] is the descriptive half (what kind of layout, which way it
//! flows, how far apart things are). [`DerivedLayout`] is the property half
//! handed to the emitter. The two are written together by the classifier and
//! must agree: see [`NodeLayout::agrees_with`].

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    #[default]
    Default,
    AutoLayout,
    Grid,
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "HORIZONTAL" => Some(Direction::Horizontal),
            "VERTICAL" => Some(Direction::Vertical),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    /// Shorthand value, `top right bottom left`.
    pub fn css(&self) -> String {
        format!(
            "{} {} {} {}",
            format_px(self.top),
            format_px(self.right),
            format_px(self.bottom),
            format_px(self.left)
        )
    }
}

/// Alignment along one axis, named after the flexbox keyword it emits.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AxisAlignment {
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    Baseline,
}

impl AxisAlignment {
    /// Map the design tool's axis-alignment enum.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "MIN" => Some(AxisAlignment::FlexStart),
            "MAX" => Some(AxisAlignment::FlexEnd),
            "CENTER" => Some(AxisAlignment::Center),
            "SPACE_BETWEEN" => Some(AxisAlignment::SpaceBetween),
            "BASELINE" => Some(AxisAlignment::Baseline),
            _ => None,
        }
    }

    pub fn css(&self) -> &'static str {
        match self {
            AxisAlignment::FlexStart => "flex-start",
            AxisAlignment::FlexEnd => "flex-end",
            AxisAlignment::Center => "center",
            AxisAlignment::SpaceBetween => "space-between",
            AxisAlignment::Baseline => "baseline",
        }
    }
}

#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    pub primary: Option<AxisAlignment>,
    pub counter: Option<AxisAlignment>,
}

#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq)]
pub struct NodeLayout {
    #[serde(rename = "type")]
    pub kind: LayoutType,
    pub direction: Option<Direction>,
    pub spacing: f64,
    pub padding: Padding,
    pub alignment: Alignment,
}

impl NodeLayout {
    /// Layout declared by the source tool (native auto-layout frames).
    pub fn declared(direction: Direction, spacing: f64, padding: Padding, alignment: Alignment) -> Self {
        Self {
            kind: LayoutType::AutoLayout,
            direction: Some(direction),
            spacing,
            padding,
            alignment,
        }
    }

    /// True when `derived` has the shape this descriptor implies.
    pub fn agrees_with(&self, derived: &DerivedLayout) -> bool {
        match (self.kind, derived) {
            (LayoutType::Default, DerivedLayout::None) => true,
            (LayoutType::AutoLayout, DerivedLayout::Flex(flex)) => {
                self.direction == Some(flex.direction.into())
            }
            (LayoutType::Grid, DerivedLayout::Grid(_)) => true,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    Column,
}

impl From<FlexDirection> for Direction {
    fn from(d: FlexDirection) -> Self {
        match d {
            FlexDirection::Row => Direction::Horizontal,
            FlexDirection::Column => Direction::Vertical,
        }
    }
}

impl From<Direction> for FlexDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Horizontal => FlexDirection::Row,
            Direction::Vertical => FlexDirection::Column,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlexProps {
    pub direction: FlexDirection,
    pub gap: Option<f64>,
    pub align_items: Option<AxisAlignment>,
    pub justify_content: Option<AxisAlignment>,
    pub padding: Option<Padding>,
}

impl FlexProps {
    pub fn new(direction: FlexDirection) -> Self {
        Self {
            direction,
            gap: None,
            align_items: None,
            justify_content: None,
            padding: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridProps {
    pub columns: usize,
    pub rows: usize,
    pub column_gap: Option<f64>,
    pub row_gap: Option<f64>,
    pub padding: Option<Padding>,
}

/// Layout-system properties produced by inference.
///
/// Flex and grid are mutually exclusive by construction. Serializes as the
/// CSS property map from [`DerivedLayout::properties`]; `None` is `{}`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DerivedLayout {
    #[default]
    None,
    Flex(FlexProps),
    Grid(GridProps),
}

impl DerivedLayout {
    pub fn is_none(&self) -> bool {
        matches!(self, DerivedLayout::None)
    }

    pub fn padding(&self) -> Option<Padding> {
        match self {
            DerivedLayout::None => None,
            DerivedLayout::Flex(flex) => flex.padding,
            DerivedLayout::Grid(grid) => grid.padding,
        }
    }

    /// Flatten into ordered `(property, value)` pairs, CSS naming.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        let mut props = Vec::new();
        match self {
            DerivedLayout::None => {}
            DerivedLayout::Flex(flex) => {
                props.push(("display", "flex".to_string()));
                let direction = match flex.direction {
                    FlexDirection::Row => "row",
                    FlexDirection::Column => "column",
                };
                props.push(("flex-direction", direction.to_string()));
                if let Some(gap) = flex.gap {
                    props.push(("gap", format_px(gap)));
                }
                if let Some(justify) = flex.justify_content {
                    props.push(("justify-content", justify.css().to_string()));
                }
                if let Some(align) = flex.align_items {
                    props.push(("align-items", align.css().to_string()));
                }
            }
            DerivedLayout::Grid(grid) => {
                props.push(("display", "grid".to_string()));
                props.push((
                    "grid-template-columns",
                    format!("repeat({}, 1fr)", grid.columns),
                ));
                props.push(("grid-template-rows", format!("repeat({}, auto)", grid.rows)));
                if let Some(gap) = grid.column_gap {
                    props.push(("column-gap", format_px(gap)));
                }
                if let Some(gap) = grid.row_gap {
                    props.push(("row-gap", format_px(gap)));
                }
            }
        }
        if let Some(padding) = self.padding() {
            props.push(("padding", padding.css()));
        }
        props
    }

    /// Look up a single property by name.
    pub fn property(&self, name: &str) -> Option<String> {
        self.properties()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

impl Serialize for DerivedLayout {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let props = self.properties();
        let mut map = serializer.serialize_map(Some(props.len()))?;
        for (name, value) in &props {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn round_px(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `Some(value)` when it prints as a non-zero length through [`format_px`].
pub fn visible_px(value: f64) -> Option<f64> {
    (round_px(value) > 0.0).then_some(value)
}

/// Pixel length, at most two decimals, no trailing zeros.
pub fn format_px(value: f64) -> String {
    let rounded = round_px(value);
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}px")
}
