//! Visual style records attached to every node.
//!
//! Everything here is write-once: it is decoded from the raw record when the
//! node is created and never touched by layout inference. Properties the
//! emitter may not understand (gradient stops, vector paths) are carried as
//! opaque JSON.

use serde::Serialize;
use serde_json::Value;

/// An 8-bit RGB color with a fractional alpha.
#[derive(Clone, Copy, Serialize, Debug, PartialEq)]
#[serde(into = "CssColor")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    /// Build from unit-range channels as the design tool stores them.
    /// Channels are truncated, not rounded.
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit_to_byte(r),
            g: unit_to_byte(g),
            b: unit_to_byte(b),
            a: a as f32,
        }
    }

    /// `rgba(r, g, b, a)` form.
    pub fn rgba(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Lowercase `#rrggbb` form. Alpha is dropped.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[inline]
fn unit_to_byte(v: f64) -> u8 {
    (v * 255.0).clamp(0.0, 255.0) as u8
}

/// Serialized shape of a [`Color`]: both textual forms side by side.
#[derive(Serialize, Debug)]
pub struct CssColor {
    pub rgba: String,
    pub hex: String,
}

impl From<Color> for CssColor {
    fn from(c: Color) -> Self {
        Self {
            rgba: c.rgba(),
            hex: c.hex(),
        }
    }
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
    Angular,
    Diamond,
}

/// One paint layer of a node.
#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Fill {
    Color {
        color: Color,
    },
    Image {
        image_ref: String,
    },
    Gradient {
        gradient: GradientKind,
        handle_positions: Value,
        stops: Value,
    },
}

impl Fill {
    pub fn color(&self) -> Option<&Color> {
        match self {
            Fill::Color { color } => Some(color),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrokeAlign {
    #[default]
    Inside,
    Outside,
    Center,
}

impl StrokeAlign {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OUTSIDE" => StrokeAlign::Outside,
            "CENTER" => StrokeAlign::Center,
            _ => StrokeAlign::Inside,
        }
    }
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    Solid,
    Dashed,
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub weight: f32,
    pub align: StrokeAlign,
    pub style: StrokeStyle,
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub offset_x: f32,
    pub offset_y: f32,
    pub radius: f32,
    pub spread: f32,
    pub inset: bool,
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum CornerRadius {
    Uniform(f32),
    #[serde(rename_all = "camelCase")]
    PerCorner {
        top_left: f32,
        top_right: f32,
        bottom_right: f32,
        bottom_left: f32,
    },
}

impl Default for CornerRadius {
    fn default() -> Self {
        CornerRadius::Uniform(0.0)
    }
}

#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Typography of a text node.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct TextStyle {
    pub content: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: f32,
    /// Lowercased horizontal alignment (`left`, `center`, `right`, `justified`).
    pub text_align: String,
    pub font_style: FontStyle,
    /// Lowercased decoration (`none`, `underline`, `strikethrough`).
    pub text_decoration: String,
    /// `None` means `auto`.
    pub line_height: Option<f32>,
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_family: "Roboto".to_string(),
            font_size: 14.0,
            font_weight: 400.0,
            text_align: "left".to_string(),
            font_style: FontStyle::Normal,
            text_decoration: "none".to_string(),
            line_height: None,
            letter_spacing: 0.0,
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct NodeStyle {
    pub fills: Vec<Fill>,
    pub strokes: Vec<Stroke>,
    pub shadows: Vec<Shadow>,
    pub radius: CornerRadius,
    pub opacity: f32,
    pub visible: bool,
    pub text: Option<TextStyle>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fills: Vec::new(),
            strokes: Vec::new(),
            shadows: Vec::new(),
            radius: CornerRadius::default(),
            opacity: 1.0,
            visible: true,
            text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_truncates_channels() {
        let c = Color::from_unit(1.0, 0.5, 0.0, 1.0);
        assert_eq!(c.r, 255);
        assert_eq!(c.g, 127);
        assert_eq!(c.b, 0);
        assert_eq!(c.hex(), "#ff7f00");
        assert_eq!(c.rgba(), "rgba(255, 127, 0, 1)");
    }

    #[test]
    fn test_color_alpha_fraction() {
        let c = Color::from_unit(0.0, 0.0, 0.0, 0.25);
        assert_eq!(c.rgba(), "rgba(0, 0, 0, 0.25)");
        assert_eq!(c.hex(), "#000000");
    }

    #[test]
    fn test_color_serializes_both_forms() {
        let fill = Fill::Color {
            color: Color::from_unit(0.0, 0.0, 1.0, 1.0),
        };
        let json = serde_json::to_value(&fill).unwrap();
        assert_eq!(json["kind"], "color");
        assert_eq!(json["color"]["hex"], "#0000ff");
        assert_eq!(json["color"]["rgba"], "rgba(0, 0, 255, 1)");
    }

    #[test]
    fn test_per_corner_radius_serializes_camel_case() {
        let r = CornerRadius::PerCorner {
            top_left: 1.0,
            top_right: 2.0,
            bottom_right: 3.0,
            bottom_left: 4.0,
        };
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["topLeft"], 1.0);
        assert_eq!(json["bottomLeft"], 4.0);
    }

    #[test]
    fn test_stroke_align_parse() {
        assert_eq!(StrokeAlign::parse("OUTSIDE"), StrokeAlign::Outside);
        assert_eq!(StrokeAlign::parse("CENTER"), StrokeAlign::Center);
        assert_eq!(StrokeAlign::parse("whatever"), StrokeAlign::Inside);
    }
}
