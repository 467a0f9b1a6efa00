//! Block Layout
//!
//! Block formatting context over the DOM tree. Every displayed element is a
//! block box: boxes stack vertically and fill their container's width.
//! Absolutely positioned boxes are deferred until their containing block
//! has a height.

use std::collections::HashMap;

use domops_css::{LengthUnit, StyleResolver};
use domops_dom::{DomTree, NodeId, Rect};

use crate::Viewport;
use crate::box_model::{BoxDimensions, BoxStyle, Position};

/// Placement of one element, page-absolute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaidOut {
    pub border_box: Rect,
    pub padding_box: Rect,
    pub position: Position,
}

/// Inherited values flowing down the tree
#[derive(Debug, Clone, Copy)]
struct Inherited {
    font_size: f64,
    line_height: f64,
}

/// An out-of-flow box waiting for its containing block
struct Deferred {
    node: NodeId,
    style: BoxStyle,
    static_x: f64,
    static_y: f64,
    inherited: Inherited,
}

pub(crate) struct BlockLayout<'a> {
    tree: &'a DomTree,
    resolver: &'a StyleResolver,
    viewport: &'a Viewport,
    boxes: HashMap<NodeId, LaidOut>,
}

impl<'a> BlockLayout<'a> {
    pub(crate) fn new(tree: &'a DomTree, resolver: &'a StyleResolver, viewport: &'a Viewport) -> Self {
        Self {
            tree,
            resolver,
            viewport,
            boxes: HashMap::new(),
        }
    }

    /// Lay out the whole document against the viewport
    pub(crate) fn run(mut self) -> HashMap<NodeId, LaidOut> {
        let icb = self.viewport_rect();
        let inherited = Inherited {
            font_size: self.viewport.font_size,
            line_height: self.viewport.line_height,
        };

        let mut deferred = Vec::new();
        self.layout_children(
            self.tree.root(),
            icb.x,
            icb.y,
            icb.width,
            Some(icb.height),
            inherited,
            &mut deferred,
        );
        self.place_all(deferred, icb);
        self.boxes
    }

    fn viewport_rect(&self) -> Rect {
        Rect::from_xywh(0.0, 0.0, self.viewport.width, self.viewport.height)
    }

    fn style_of(&self, node: NodeId) -> BoxStyle {
        let display = self.resolver.computed_value(self.tree, node, "display");
        BoxStyle::new(self.resolver.cascaded_style(self.tree, node), &display)
    }

    /// Stack the children of `parent` in a content box starting at (x, y)
    ///
    /// Returns the height used.
    #[allow(clippy::too_many_arguments)]
    fn layout_children(
        &mut self,
        parent: NodeId,
        x: f64,
        y: f64,
        width: f64,
        height: Option<f64>,
        inherited: Inherited,
        deferred: &mut Vec<Deferred>,
    ) -> f64 {
        let tree = self.tree;
        let mut cursor_y = y;
        let mut prev_margin_bottom: f64 = 0.0;

        for (child, node) in tree.children(parent) {
            if let Some(text) = node.as_text() {
                if !text.trim().is_empty() {
                    cursor_y += prev_margin_bottom + inherited.line_height;
                    prev_margin_bottom = 0.0;
                }
                continue;
            }
            if !node.is_element() {
                continue;
            }

            let style = self.style_of(child);
            if style.display_none {
                continue;
            }

            let static_y = cursor_y + prev_margin_bottom;
            match style.position {
                Position::Absolute => {
                    deferred.push(Deferred {
                        node: child,
                        style,
                        static_x: x,
                        static_y,
                        inherited,
                    });
                    continue;
                }
                Position::Fixed => {
                    let deferred = Deferred {
                        node: child,
                        style,
                        static_x: x,
                        static_y,
                        inherited,
                    };
                    self.place_out_of_flow(deferred, self.viewport_rect());
                    continue;
                }
                _ => {}
            }

            let font_size = style.font_size(inherited.font_size);
            let dims = style.dimensions(font_size, width);
            let content_width = content_width(&style, &dims, font_size, width);

            // Adjacent vertical margins collapse to the larger of the two
            let margin_top = dims.margin.top.max(prev_margin_bottom);
            let border_x = x + dims.margin.left;
            let border_y = cursor_y + margin_top;

            let laid = self.layout_element(
                child,
                &style,
                dims,
                (border_x, border_y),
                content_width,
                height,
                inherited,
                deferred,
            );
            cursor_y = laid.border_box.bottom();
            prev_margin_bottom = dims.margin.bottom;

            if style.position == Position::Relative {
                let (dx, dy) = relative_offset(&style, font_size, width, height);
                self.shift_subtree(child, dx, dy);
            }
        }

        cursor_y + prev_margin_bottom - y
    }

    /// Lay out one element whose border box starts at `origin`
    #[allow(clippy::too_many_arguments)]
    fn layout_element(
        &mut self,
        node: NodeId,
        style: &BoxStyle,
        mut dims: BoxDimensions,
        origin: (f64, f64),
        content_width: f64,
        containing_height: Option<f64>,
        inherited: Inherited,
        deferred: &mut Vec<Deferred>,
    ) -> LaidOut {
        let font_size = style.font_size(inherited.font_size);
        let own = Inherited {
            font_size,
            line_height: style.line_height(font_size, inherited.line_height),
        };

        dims.content.x = origin.0 + dims.border.left + dims.padding.left;
        dims.content.y = origin.1 + dims.border.top + dims.padding.top;
        dims.content.width = content_width;

        let explicit_height = style.length("height").and_then(|length| {
            let base = match length.unit {
                LengthUnit::Percent => containing_height?,
                _ => 0.0,
            };
            let h = length.to_px(font_size, base);
            Some(if style.border_box_sizing {
                (h - dims.border.vertical() - dims.padding.vertical()).max(0.0)
            } else {
                h.max(0.0)
            })
        });

        // positioned boxes contain their absolute descendants
        let mut own_deferred = Vec::new();
        let sink = if style.position.is_positioned() {
            &mut own_deferred
        } else {
            deferred
        };
        let used = self.layout_children(
            node,
            dims.content.x,
            dims.content.y,
            dims.content.width,
            explicit_height,
            own,
            sink,
        );
        dims.content.height = explicit_height.unwrap_or(used);

        let laid = LaidOut {
            border_box: dims.border_box(),
            padding_box: dims.padding_box(),
            position: style.position,
        };
        self.boxes.insert(node, laid);
        tracing::trace!(%node, x = laid.border_box.x, y = laid.border_box.y, "laid out box");

        self.place_all(own_deferred, laid.padding_box);
        laid
    }

    fn place_all(&mut self, deferred: Vec<Deferred>, anchor: Rect) {
        for d in deferred {
            self.place_out_of_flow(d, anchor);
        }
    }

    /// Place an absolute or fixed box against `anchor` (a padding box)
    fn place_out_of_flow(&mut self, d: Deferred, anchor: Rect) {
        let style = &d.style;
        let font_size = style.font_size(d.inherited.font_size);
        let dims = style.dimensions(font_size, anchor.width);

        let left = style.px("left", font_size, anchor.width);
        let right = style.px("right", font_size, anchor.width);
        let top = style.px("top", font_size, anchor.height);
        let bottom = style.px("bottom", font_size, anchor.height);

        let content_width = match (style.length("width"), left, right) {
            (Some(_), ..) => content_width(style, &dims, font_size, anchor.width),
            (None, Some(l), Some(r)) => (anchor.width - l - r - dims.horizontal_extras()).max(0.0),
            (None, ..) => (anchor.width - dims.horizontal_extras()).max(0.0),
        };
        let border_width = content_width + dims.border.horizontal() + dims.padding.horizontal();

        let border_x = match (left, right) {
            (Some(l), _) => anchor.x + l + dims.margin.left,
            (None, Some(r)) => anchor.right() - r - dims.margin.right - border_width,
            (None, None) => d.static_x + dims.margin.left,
        };
        let border_y = match top {
            Some(t) => anchor.y + t + dims.margin.top,
            None => d.static_y + dims.margin.top,
        };

        let laid = self.layout_element(
            d.node,
            style,
            dims,
            (border_x, border_y),
            content_width,
            Some(anchor.height),
            d.inherited,
            &mut Vec::new(),
        );

        if let (None, Some(b)) = (top, bottom) {
            let target = anchor.bottom() - b - dims.margin.bottom - laid.border_box.height;
            self.shift_subtree(d.node, 0.0, target - laid.border_box.y);
        }
    }

    fn shift_subtree(&mut self, node: NodeId, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let tree = self.tree;
        for id in std::iter::once(node).chain(tree.descendants(node)) {
            if let Some(laid) = self.boxes.get_mut(&id) {
                laid.border_box.x += dx;
                laid.border_box.y += dy;
                laid.padding_box.x += dx;
                laid.padding_box.y += dy;
            }
        }
    }
}

/// Used content width: explicit `width`, or whatever the container leaves
fn content_width(style: &BoxStyle, dims: &BoxDimensions, font_size: f64, containing: f64) -> f64 {
    match style.px("width", font_size, containing) {
        Some(w) if style.border_box_sizing => {
            (w - dims.border.horizontal() - dims.padding.horizontal()).max(0.0)
        }
        Some(w) => w.max(0.0),
        None => (containing - dims.horizontal_extras()).max(0.0),
    }
}

/// `left`/`top` (or negated `right`/`bottom`) of a relative box
fn relative_offset(
    style: &BoxStyle,
    font_size: f64,
    width: f64,
    height: Option<f64>,
) -> (f64, f64) {
    let height = height.unwrap_or(0.0);
    let dx = style
        .px("left", font_size, width)
        .or_else(|| style.px("right", font_size, width).map(|r| -r))
        .unwrap_or(0.0);
    let dy = style
        .px("top", font_size, height)
        .or_else(|| style.px("bottom", font_size, height).map(|b| -b))
        .unwrap_or(0.0);
    (dx, dy)
}
