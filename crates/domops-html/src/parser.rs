//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena tree.

use domops_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!(url, bytes = html.len(), "parsing HTML document");

        let dom = read_rcdom(html)?;
        let mut document = Document::empty(url);
        convert_children(&dom.document, document.tree_mut(), Some(NodeId::ROOT))?;
        document.finalize();

        tracing::debug!(nodes = document.tree().len(), "parsed HTML document");
        Ok(document)
    }

    /// Parse a markup fragment into detached nodes of `tree`
    ///
    /// The fragment is parsed in a `<body>` context; the returned ids are the
    /// top-level nodes in source order.
    pub fn parse_fragment(&self, tree: &mut DomTree, html: &str) -> Result<Vec<NodeId>, HtmlError> {
        let dom = read_rcdom(&format!("<!DOCTYPE html><html><head></head><body>{html}"))?;
        let Some(body) = find_body(&dom.document) else {
            return Ok(Vec::new());
        };

        let mut roots = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(id) = convert_node(child, tree, None)? {
                roots.push(id);
            }
        }
        tracing::trace!(nodes = roots.len(), "parsed HTML fragment");
        Ok(roots)
    }
}

fn read_rcdom(html: &str) -> Result<RcDom, HtmlError> {
    Ok(parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?)
}

fn find_body(document: &Handle) -> Option<Handle> {
    let children = document.children.borrow();
    let html = children.iter().find(|h| is_element_named(h, "html"))?;
    let html_children = html.children.borrow();
    html_children
        .iter()
        .find(|h| is_element_named(h, "body"))
        .cloned()
}

fn is_element_named(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if name.local.as_ref() == tag)
}

fn convert_children(
    handle: &Handle,
    tree: &mut DomTree,
    parent: Option<NodeId>,
) -> Result<(), HtmlError> {
    for child in handle.children.borrow().iter() {
        convert_node(child, tree, parent)?;
    }
    Ok(())
}

/// Convert an RcDom node (and its subtree) into `tree`
///
/// Returns the new node's id, or `None` for nodes that are not kept.
fn convert_node(
    handle: &Handle,
    tree: &mut DomTree,
    parent: Option<NodeId>,
) -> Result<Option<NodeId>, HtmlError> {
    let id = match &handle.data {
        RcNodeData::Document => {
            convert_children(handle, tree, parent)?;
            return Ok(None);
        }
        RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
        RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
        RcNodeData::Comment { contents } => tree.create_comment(contents),
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                tree.set_attribute(id, &attr.name.local, &attr.value)?;
            }
            id
        }
        RcNodeData::ProcessingInstruction { .. } => return Ok(None),
    };

    if let Some(parent) = parent {
        tree.append_child(parent, id)?;
    }
    convert_children(handle, tree, Some(id))?;
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert_eq!(doc.title(), "Test");
        let body = doc.body().unwrap();
        let p = doc.tree().element_children(body).next().unwrap();
        assert_eq!(doc.tree().tag_name(p), Some("p"));
        assert_eq!(doc.tree().text_content(p), "Hello");
    }

    #[test]
    fn test_parse_wraps_fragments_in_document() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();
        assert!(doc.document_element().is_some());
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_parse_fragment_is_detached() {
        let mut tree = DomTree::new();
        let nodes = HtmlParser::new()
            .parse_fragment(&mut tree, "<b>bold</b> and <i>it</i>")
            .unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(tree.tag_name(nodes[0]), Some("b"));
        assert_eq!(tree.get(nodes[1]).and_then(|n| n.as_text()), Some(" and "));
        assert!(nodes.iter().all(|&n| tree.parent(n).is_none()));
    }
}
