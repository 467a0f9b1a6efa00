//! Geometry reads
//!
//! Every read lays the document out first if the tree changed since the
//! previous pass, then reports the stored offset geometry.

use domops_dom::{DomTree, ElementGeometry, NodeId};
use serde::{Deserialize, Serialize};

use crate::{Result, Selection};

/// Options for [`Selection::bounds`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxOptions {
    /// Report page coordinates instead of offset-parent coordinates
    pub absolute: bool,
}

/// Element offsets in CSS terms
///
/// `right` and `bottom` are distances from the offset parent's right and
/// bottom edges, not coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CssBox {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

fn geometry_of(tree: &DomTree, node: NodeId) -> ElementGeometry {
    tree.geometry(node).unwrap_or_default()
}

/// Page location: offsets summed up the offset-parent chain
fn page_location(tree: &DomTree, node: NodeId) -> [f64; 2] {
    let mut location = [0.0, 0.0];
    let mut current = Some(node);
    while let Some(el) = current {
        let Some(geometry) = tree.geometry(el) else {
            tracing::warn!(node = %el, "offset parent has no geometry");
            break;
        };
        location[0] += geometry.offset_left;
        location[1] += geometry.offset_top;
        current = geometry.offset_parent;
    }
    location
}

impl Selection {
    fn measure<T>(&self, f: impl Fn(&DomTree, NodeId) -> T) -> Result<Vec<T>> {
        self.dom().ensure_layout()?;
        Ok(self.dom().read(|doc| {
            let tree = doc.tree();
            self.iter().map(|el| f(tree, el)).collect()
        }))
    }

    /// `[x, y]` of every element on the page
    pub fn location(&self) -> Result<Vec<[f64; 2]>> {
        self.measure(page_location)
    }

    /// `[offsetWidth, offsetHeight]` of every element
    pub fn size(&self) -> Result<Vec<[f64; 2]>> {
        self.measure(|tree, el| {
            let g = geometry_of(tree, el);
            [g.offset_width, g.offset_height]
        })
    }

    /// `[left, top, right, bottom]` coordinates of every element
    ///
    /// Relative to the offset parent unless `options.absolute` is set.
    /// `right` and `bottom` are coordinates (`left + width`), unlike
    /// [`css_box`](Self::css_box).
    pub fn bounds(&self, options: BoxOptions) -> Result<Vec<[f64; 4]>> {
        self.measure(|tree, el| {
            let g = geometry_of(tree, el);
            let [x, y] = if options.absolute {
                page_location(tree, el)
            } else {
                [g.offset_left, g.offset_top]
            };
            [x, y, x + g.offset_width, y + g.offset_height]
        })
    }

    /// CSS `top/left/right/bottom` of every element against its offset parent
    ///
    /// Elements without an offset parent measure against `<body>`.
    pub fn css_box(&self) -> Result<Vec<CssBox>> {
        let body = self.dom().body();
        self.measure(|tree, el| {
            let g = geometry_of(tree, el);
            let parent = g
                .offset_parent
                .or(body)
                .map(|p| geometry_of(tree, p))
                .unwrap_or_default();
            CssBox {
                top: g.offset_top,
                left: g.offset_left,
                right: parent.offset_width - (g.offset_left + g.offset_width),
                bottom: parent.offset_height - (g.offset_top + g.offset_height),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dom;

    fn one(dom: &Dom, id: &str) -> Selection {
        dom.query(&format!("#{id}")).unwrap()
    }

    #[test]
    fn test_location_sums_offset_chain() {
        let dom = Dom::parse(
            r#"<div style="height: 40px"></div>
               <div id=outer style="position: relative; padding: 10px; left: 5px">
                 <div id=inner style="margin-left: 7px; height: 3px"></div>
               </div>"#,
        )
        .unwrap();
        assert_eq!(one(&dom, "outer").location().unwrap(), vec![[5.0, 40.0]]);
        assert_eq!(one(&dom, "inner").location().unwrap(), vec![[22.0, 50.0]]);
        assert_eq!(one(&dom, "inner").bounds(BoxOptions::default()).unwrap()[0][..2], [17.0, 10.0]);
    }

    #[test]
    fn test_geometry_follows_mutations() {
        let dom = Dom::parse(r#"<div id=a style="height: 10px; width: 30px"></div>"#).unwrap();
        let a = one(&dom, "a");
        assert_eq!(a.size().unwrap(), vec![[30.0, 10.0]]);

        a.set_styles([("height", "25px"), ("width", "50%")]).unwrap();
        assert_eq!(a.size().unwrap(), vec![[640.0, 25.0]]);

        a.hide().unwrap();
        assert_eq!(a.size().unwrap(), vec![[0.0, 0.0]]);
    }

    #[test]
    fn test_css_box_against_body() {
        let dom = Dom::parse(
            r#"<div id=a style="height: 100px"></div>
               <div id=b style="height: 20px; width: 200px"></div>"#,
        )
        .unwrap();
        // body wraps both boxes: 1280 x 120
        let b = one(&dom, "b").css_box().unwrap()[0];
        assert_eq!(
            b,
            CssBox {
                top: 100.0,
                left: 0.0,
                right: 1080.0,
                bottom: 0.0
            }
        );
    }
}
