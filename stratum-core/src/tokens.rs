//! Design-token collection.
//!
//! Walks the reachable tree and gathers the distinct colors and named text
//! styles a stylesheet would hoist into variables.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::node::Node;
use crate::style::{Color, Fill};
use crate::tree::NodeTree;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSource {
    Fill,
    Stroke,
    Text,
    Shadow,
}

impl ColorSource {
    fn suffix(self) -> &'static str {
        match self {
            ColorSource::Fill => "color",
            ColorSource::Stroke => "stroke",
            ColorSource::Text => "text",
            ColorSource::Shadow => "shadow",
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct ColorToken {
    pub name: String,
    pub hex: String,
    pub rgba: String,
    pub source: ColorSource,
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct TextToken {
    pub name: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: f32,
    pub line_height: Option<f32>,
    pub letter_spacing: f32,
}

#[derive(Clone, Serialize, Debug, Default, PartialEq)]
pub struct DesignTokens {
    pub colors: Vec<ColorToken>,
    pub text_styles: Vec<TextToken>,
}

impl DesignTokens {
    pub fn collect(tree: &NodeTree) -> Self {
        let mut collector = Collector::default();
        for handle in tree.reachable() {
            if let Some(node) = tree.get(handle) {
                collector.visit(node);
            }
        }
        collector.tokens
    }
}

#[derive(Default)]
struct Collector {
    tokens: DesignTokens,
    hexes: FxHashSet<String>,
    names: FxHashSet<String>,
    text_names: FxHashSet<String>,
}

impl Collector {
    fn visit(&mut self, node: &Node) {
        // A text node's first fill is its glyph color.
        let mut fills = node.style.fills.iter().filter_map(Fill::color);
        if node.style.text.is_some() {
            if let Some(color) = fills.next() {
                self.add_color(&node.name, ColorSource::Text, color);
            }
        }
        for color in fills {
            self.add_color(&node.name, ColorSource::Fill, color);
        }
        for stroke in &node.style.strokes {
            self.add_color(&node.name, ColorSource::Stroke, &stroke.color);
        }
        for shadow in &node.style.shadows {
            self.add_color(&node.name, ColorSource::Shadow, &shadow.color);
        }

        if let Some(text) = &node.style.text {
            if self.text_names.insert(node.name.clone()) {
                self.tokens.text_styles.push(TextToken {
                    name: node.name.clone(),
                    font_family: text.font_family.clone(),
                    font_size: text.font_size,
                    font_weight: text.font_weight,
                    line_height: text.line_height,
                    letter_spacing: text.letter_spacing,
                });
            }
        }
    }

    fn add_color(&mut self, node_name: &str, source: ColorSource, color: &Color) {
        let hex = color.hex();
        if !self.hexes.insert(hex.clone()) {
            return;
        }
        let base = format!("{node_name}-{}", source.suffix());
        let mut name = base.clone();
        let mut n = 2;
        while !self.names.insert(name.clone()) {
            name = format!("{base}-{n}");
            n += 1;
        }
        self.tokens.colors.push(ColorToken {
            name,
            hex,
            rgba: color.rgba(),
            source,
        });
    }
}
