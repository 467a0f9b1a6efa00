//! Geometry
//!
//! Rectangles and the offset properties a layout pass stores on each element.

use crate::NodeId;

/// Axis-aligned rectangle in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Element geometry state
///
/// `offset_*` are relative to `offset_parent`. `border_box` and `padding_box`
/// are page-absolute and only used by the layout pass itself.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementGeometry {
    pub offset_top: f64,
    pub offset_left: f64,
    pub offset_width: f64,
    pub offset_height: f64,
    pub offset_parent: Option<NodeId>,
    pub border_box: Rect,
    pub padding_box: Rect,
}

impl ElementGeometry {
    /// Offset-parent relative rect
    pub fn offset_rect(&self) -> Rect {
        Rect::from_xywh(
            self.offset_left,
            self.offset_top,
            self.offset_width,
            self.offset_height,
        )
    }
}
