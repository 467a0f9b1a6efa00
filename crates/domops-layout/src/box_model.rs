//! CSS Box Model
//!
//! Resolves the style values layout needs into pixel edges.

use std::collections::HashMap;

use domops_css::{Length, initial_value};
use domops_dom::Rect;

/// Edge sizes (top, right, bottom, left)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeSizes {
    pub fn all(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// `position` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "relative" => Self::Relative,
            "absolute" => Self::Absolute,
            "fixed" => Self::Fixed,
            "sticky" => Self::Sticky,
            _ => Self::Static,
        }
    }

    /// Establishes an offset parent / containing block for absolutes
    pub fn is_positioned(self) -> bool {
        self != Self::Static
    }

    /// Taken out of normal flow
    pub fn is_out_of_flow(self) -> bool {
        matches!(self, Self::Absolute | Self::Fixed)
    }
}

/// The style values the block layout reads, still unresolved
#[derive(Debug, Clone, Default)]
pub struct BoxStyle {
    pub display_none: bool,
    pub position: Position,
    pub border_box_sizing: bool,
    values: HashMap<String, String>,
}

impl BoxStyle {
    /// Build from an element's cascaded declarations and its display value
    pub fn new(cascaded: HashMap<String, String>, display: &str) -> Self {
        let keyword = |name: &str| cascaded.get(name).map(|v| v.trim().to_ascii_lowercase());
        Self {
            display_none: display.trim() == "none",
            position: Position::parse(&keyword("position").unwrap_or_default()),
            border_box_sizing: keyword("box-sizing").as_deref() == Some("border-box"),
            values: cascaded,
        }
    }

    fn value(&self, property: &str) -> &str {
        self.values
            .get(property)
            .map(String::as_str)
            .unwrap_or_else(|| initial_value(property))
    }

    /// A length property, `None` when `auto` or unparsable
    pub fn length(&self, property: &str) -> Option<Length> {
        Length::parse(self.value(property))
    }

    /// Resolve a length property to px, `None` when `auto`
    pub fn px(&self, property: &str, font_size: f64, percent_base: f64) -> Option<f64> {
        self.length(property)
            .map(|l| l.to_px(font_size, percent_base))
    }

    fn edges(&self, names: [&str; 4], font_size: f64, percent_base: f64) -> EdgeSizes {
        let px = |name| self.px(name, font_size, percent_base).unwrap_or(0.0);
        EdgeSizes {
            top: px(names[0]),
            right: px(names[1]),
            bottom: px(names[2]),
            left: px(names[3]),
        }
    }

    /// Own `font-size` in px; inherits `parent` when not declared
    pub fn font_size(&self, parent: f64) -> f64 {
        self.values
            .get("font-size")
            .and_then(|v| Length::parse(v))
            .map_or(parent, |l| l.to_px(parent, parent))
    }

    /// Own `line-height` in px; inherits `parent` when not declared
    pub fn line_height(&self, font_size: f64, parent: f64) -> f64 {
        let Some(value) = self.values.get("line-height") else {
            return parent;
        };
        if let Some(length) = Length::parse(value) {
            return length.to_px(font_size, font_size);
        }
        // unitless multiplier
        value
            .trim()
            .parse::<f64>()
            .map_or(parent, |factor| factor * font_size)
    }

    /// Resolve margin/border/padding against the containing block width
    pub fn dimensions(&self, font_size: f64, containing_width: f64) -> BoxDimensions {
        let border = self.edges(
            [
                "border-top-width",
                "border-right-width",
                "border-bottom-width",
                "border-left-width",
            ],
            font_size,
            containing_width,
        );

        BoxDimensions {
            content: Rect::default(),
            padding: self.edges(
                ["padding-top", "padding-right", "padding-bottom", "padding-left"],
                font_size,
                containing_width,
            ),
            border,
            margin: self.edges(
                ["margin-top", "margin-right", "margin-bottom", "margin-left"],
                font_size,
                containing_width,
            ),
        }
    }
}

/// Box dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxDimensions {
    pub content: Rect,
    pub padding: EdgeSizes,
    pub border: EdgeSizes,
    pub margin: EdgeSizes,
}

impl BoxDimensions {
    /// Horizontal space taken besides the content
    pub fn horizontal_extras(&self) -> f64 {
        self.margin.horizontal() + self.border.horizontal() + self.padding.horizontal()
    }

    /// Get the area covered by content + padding
    pub fn padding_box(&self) -> Rect {
        Rect {
            x: self.content.x - self.padding.left,
            y: self.content.y - self.padding.top,
            width: self.content.width + self.padding.horizontal(),
            height: self.content.height + self.padding.vertical(),
        }
    }

    /// Get the area covered by content + padding + border
    pub fn border_box(&self) -> Rect {
        let padding = self.padding_box();
        Rect {
            x: padding.x - self.border.left,
            y: padding.y - self.border.top,
            width: padding.width + self.border.horizontal(),
            height: padding.height + self.border.vertical(),
        }
    }

    /// Get the area covered by content + padding + border + margin
    pub fn margin_box(&self) -> Rect {
        let border = self.border_box();
        Rect {
            x: border.x - self.margin.left,
            y: border.y - self.margin.top,
            width: border.width + self.margin.horizontal(),
            height: border.height + self.margin.vertical(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(pairs: &[(&str, &str)]) -> BoxStyle {
        let cascaded = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BoxStyle::new(cascaded, "block")
    }

    #[test]
    fn test_box_nesting() {
        let dims = BoxDimensions {
            content: Rect::from_xywh(20.0, 20.0, 100.0, 50.0),
            padding: EdgeSizes::all(5.0),
            border: EdgeSizes::all(2.0),
            margin: EdgeSizes::all(10.0),
        };
        assert_eq!(dims.padding_box(), Rect::from_xywh(15.0, 15.0, 110.0, 60.0));
        assert_eq!(dims.border_box(), Rect::from_xywh(13.0, 13.0, 114.0, 64.0));
        assert_eq!(dims.margin_box(), Rect::from_xywh(3.0, 3.0, 134.0, 84.0));
    }

    #[test]
    fn test_dimensions_resolve_units() {
        let s = style(&[
            ("margin-left", "10%"),
            ("padding-top", "1em"),
            ("border-left-width", "3px"),
            ("position", "Absolute"),
        ]);
        let dims = s.dimensions(20.0, 300.0);
        assert_eq!(dims.margin.left, 30.0);
        assert_eq!(dims.padding.top, 20.0);
        assert_eq!(dims.border.left, 3.0);
        assert_eq!(dims.border.right, 0.0);
        assert_eq!(s.position, Position::Absolute);
        assert!(s.position.is_out_of_flow());
    }

    #[test]
    fn test_auto_lengths() {
        let s = style(&[("width", "auto")]);
        assert_eq!(s.px("width", 16.0, 100.0), None);
        assert_eq!(s.px("height", 16.0, 100.0), None);
        assert_eq!(s.px("margin-top", 16.0, 100.0), Some(0.0));
        assert!(!s.display_none);
    }
}
