//! Markup serialization
//!
//! Produces `innerHTML`/`outerHTML` strings from the tree, following the
//! HTML fragment serialization rules: void elements get no end tag and the
//! contents of raw-text elements are written verbatim.

use domops_dom::{DomTree, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Tree-to-markup writer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Markup of the children of `node`
    pub fn serialize_inner(&self, tree: &DomTree, node: NodeId) -> String {
        let mut out = String::new();
        self.write_children(tree, node, &mut out);
        out
    }

    /// Markup of `node` itself
    pub fn serialize_outer(&self, tree: &DomTree, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(tree, node, &mut out);
        out
    }

    fn write_children(&self, tree: &DomTree, parent: NodeId, out: &mut String) {
        let raw = tree
            .tag_name(parent)
            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
        for (child, node) in tree.children(parent) {
            match node.as_text() {
                Some(text) if raw => out.push_str(text),
                _ => self.write_node(tree, child, out),
            }
        }
    }

    fn write_node(&self, tree: &DomTree, id: NodeId, out: &mut String) {
        let Some(node) = tree.get(id) else {
            return;
        };

        match &node.data {
            NodeData::Document => self.write_children(tree, id, out),
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(&elem.tag);
                for attr in elem.attrs.iter() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_into(&attr.value, true, out);
                    out.push('"');
                }
                out.push('>');

                if !VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                    self.write_children(tree, id, out);
                    out.push_str("</");
                    out.push_str(&elem.tag);
                    out.push('>');
                }
            }
            NodeData::Text(text) => escape_into(&text.content, false, out),
            NodeData::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            NodeData::Doctype { name } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

/// Escape `&`, nbsp, and either `"` (attribute values) or `<`/`>` (text)
fn escape_into(input: &str, attribute: bool, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// `innerHTML` of `node`
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node)
}

/// `outerHTML` of `node`
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping() {
        let mut text = String::new();
        escape_into("a <b> & \"c\"\u{a0}", false, &mut text);
        assert_eq!(text, "a &lt;b&gt; &amp; \"c\"&nbsp;");

        let mut attr = String::new();
        escape_into("a <b> & \"c\"", true, &mut attr);
        assert_eq!(attr, "a <b> &amp; &quot;c&quot;");
    }

    #[test]
    fn test_void_and_raw_text() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let img = tree.create_element("img");
        let script = tree.create_element("script");
        let code = tree.create_text("a < b");
        let text = tree.create_text("x & y");
        tree.set_attribute(div, "class", "box").unwrap();
        tree.set_attribute(img, "alt", "").unwrap();
        tree.append_child(div, img).unwrap();
        tree.append_child(div, text).unwrap();
        tree.append_child(div, script).unwrap();
        tree.append_child(script, code).unwrap();

        assert_eq!(
            outer_html(&tree, div),
            r#"<div class="box"><img alt="">x &amp; y<script>a < b</script></div>"#
        );
        assert_eq!(inner_html(&tree, script), "a < b");
    }

    #[test]
    fn test_comments_and_detached_text() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let note = tree.create_comment(" note ");
        tree.append_child(p, note).unwrap();
        assert_eq!(outer_html(&tree, p), "<p><!-- note --></p>");

        let loose = tree.create_text("1 < 2");
        assert_eq!(outer_html(&tree, loose), "1 &lt; 2");
    }
}
