use serde::{Deserialize, Serialize};

/// Whether a dimension was pinned in the source or allowed to adapt.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sizing {
    Fixed,
    #[default]
    Flexible,
}

/// How a node resolves its position against its container.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    Absolute,
    #[default]
    Relative,
}

/// Absolute bounding box of a node in document coordinates.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub width_sizing: Sizing,
    pub height_sizing: Sizing,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// True when the box has a non-zero area to measure against.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
