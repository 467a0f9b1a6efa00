//! domops Layout Engine
//!
//! CSS box model and block layout. The pass stores each element's offset
//! geometry (`offsetLeft/Top/Width/Height`, `offsetParent`) on the tree.

mod block;
mod box_model;

use std::collections::HashMap;

use domops_css::StyleResolver;
use domops_dom::{Document, DomResult, DomTree, ElementGeometry, NodeId};

pub use block::LaidOut;
pub use box_model::{BoxDimensions, BoxStyle, EdgeSizes, Position};

/// Viewport and text metrics the layout runs against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Height of one line of text
    pub line_height: f64,
    /// Root font size, the base for `em`
    pub font_size: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            line_height: 18.0,
            font_size: 16.0,
        }
    }
}

/// Lay out `document` and store the geometry of every element
///
/// Elements that are not displayed, or not attached to the document, get
/// zeroed geometry. Returns the number of boxes laid out.
pub fn layout_document(document: &mut Document, viewport: &Viewport) -> DomResult<usize> {
    let body = document.body();
    let tree = document.tree();
    let resolver = StyleResolver::from_tree(tree);
    let boxes = block::BlockLayout::new(tree, &resolver, viewport).run();

    let geometries: Vec<(NodeId, ElementGeometry)> = tree
        .node_ids()
        .filter(|&id| tree.is_element(id))
        .map(|id| (id, element_geometry(tree, &boxes, body, id)))
        .collect();

    let tree = document.tree_mut();
    for (id, geometry) in geometries {
        tree.set_geometry(id, geometry)?;
    }

    tracing::debug!(
        boxes = boxes.len(),
        width = viewport.width,
        height = viewport.height,
        "layout pass"
    );
    Ok(boxes.len())
}

/// Offset geometry of one element from the laid-out boxes
fn element_geometry(
    tree: &DomTree,
    boxes: &HashMap<NodeId, LaidOut>,
    body: Option<NodeId>,
    id: NodeId,
) -> ElementGeometry {
    let Some(laid) = boxes.get(&id) else {
        return ElementGeometry::default();
    };
    let border_box = laid.border_box;
    let mut geometry = ElementGeometry {
        offset_width: border_box.width,
        offset_height: border_box.height,
        border_box,
        padding_box: laid.padding_box,
        ..ElementGeometry::default()
    };

    if Some(id) == body {
        return geometry;
    }
    if tree.tag_name(id) == Some("html") || laid.position == Position::Fixed {
        geometry.offset_left = border_box.x;
        geometry.offset_top = border_box.y;
        return geometry;
    }

    let offset_parent = tree
        .ancestors(id)
        .find(|a| {
            Some(*a) == body || boxes.get(a).is_some_and(|b| b.position.is_positioned())
        })
        .or(body);
    geometry.offset_parent = offset_parent;

    // Offsets against <body> are measured from the document origin
    let origin = match offset_parent {
        Some(parent) if Some(parent) != body => boxes.get(&parent).map(|b| b.padding_box),
        _ => None,
    };
    let (origin_x, origin_y) = origin.map_or((0.0, 0.0), |r| (r.x, r.y));
    geometry.offset_left = border_box.x - origin_x;
    geometry.offset_top = border_box.y - origin_y;
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laid_out(html: &str) -> Document {
        let mut doc = domops_html::parse(html).unwrap();
        layout_document(&mut doc, &Viewport::default()).unwrap();
        doc
    }

    fn geometry(doc: &Document, id: &str) -> ElementGeometry {
        let node = doc.get_element_by_id(id).unwrap();
        doc.tree().geometry(node).unwrap()
    }

    #[test]
    fn test_block_stacking() {
        let doc = laid_out(
            r#"<div id=a style="height: 100px"></div><div id=b style="height: 50px"></div>"#,
        );
        let a = geometry(&doc, "a");
        let b = geometry(&doc, "b");

        assert_eq!((a.offset_left, a.offset_top), (0.0, 0.0));
        assert_eq!((a.offset_width, a.offset_height), (1280.0, 100.0));
        assert_eq!(b.offset_top, 100.0);
        assert_eq!(b.offset_parent, doc.body());
    }

    #[test]
    fn test_margin_collapsing() {
        let doc = laid_out(
            r#"<div id=a style="height: 100px; margin-bottom: 30px"></div>
               <div id=b style="height: 50px; margin-top: 20px"></div>"#,
        );
        assert_eq!(geometry(&doc, "b").offset_top, 130.0);
    }

    #[test]
    fn test_nested_padding_and_offset_parent() {
        let doc = laid_out(
            r#"<div id=p style="position: relative; padding: 20px; border: 0; width: 200px">
                 <div id=c style="height: 10px"></div>
               </div>"#,
        );
        let p = geometry(&doc, "p");
        let c = geometry(&doc, "c");

        assert_eq!(p.offset_width, 240.0);
        assert_eq!(p.offset_height, 50.0);
        assert_eq!(c.offset_parent, doc.get_element_by_id("p"));
        assert_eq!((c.offset_left, c.offset_top), (20.0, 20.0));
        assert_eq!(c.offset_width, 200.0);
    }

    #[test]
    fn test_text_lines() {
        let doc = laid_out("<p id=p>one</p><p id=q style='line-height: 30px'>two</p>");
        assert_eq!(geometry(&doc, "p").offset_height, 18.0);
        let q = geometry(&doc, "q");
        assert_eq!((q.offset_top, q.offset_height), (18.0, 30.0));
    }

    #[test]
    fn test_display_none_is_zeroed() {
        let doc = laid_out(
            r#"<div id=h style="display: none; height: 40px"><span id=s>x</span></div>
               <div id=v style="height: 5px"></div>"#,
        );
        assert_eq!(geometry(&doc, "h"), ElementGeometry::default());
        assert_eq!(geometry(&doc, "s"), ElementGeometry::default());
        assert_eq!(geometry(&doc, "v").offset_top, 0.0);
    }

    #[test]
    fn test_absolute_and_relative() {
        let doc = laid_out(
            r#"<div id=anchor style="position: relative; top: 10px; height: 100px; width: 300px">
                 <div id=abs style="position: absolute; right: 0; bottom: 0; width: 50px; height: 20px"></div>
               </div>
               <div id=after style="height: 5px"></div>"#,
        );
        let anchor = geometry(&doc, "anchor");
        let abs = geometry(&doc, "abs");

        assert_eq!(anchor.offset_top, 10.0);
        // relative shift does not move following boxes
        assert_eq!(geometry(&doc, "after").offset_top, 100.0);
        assert_eq!(abs.offset_parent, doc.get_element_by_id("anchor"));
        assert_eq!((abs.offset_left, abs.offset_top), (250.0, 80.0));
        assert_eq!((abs.offset_width, abs.offset_height), (50.0, 20.0));
    }

    #[test]
    fn test_body_and_detached() {
        let mut doc = domops_html::parse("<div id=a></div>").unwrap();
        let detached = doc.tree_mut().create_element("div");
        layout_document(&mut doc, &Viewport::default()).unwrap();

        let body = doc.tree().geometry(doc.body().unwrap()).unwrap();
        assert_eq!(body.offset_parent, None);
        assert_eq!((body.offset_left, body.offset_top), (0.0, 0.0));
        assert_eq!(doc.tree().geometry(detached), Some(ElementGeometry::default()));
    }
}
