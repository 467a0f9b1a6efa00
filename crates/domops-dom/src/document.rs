//! Document - High-level document API

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under a fresh root cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure); call [`finalize`](Self::finalize)
    /// once the tree has been built
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate and cache `<html>`, `<head>` and `<body>`
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let html = tree
            .element_children(tree.root())
            .find(|&id| tree.tag_name(id) == Some("html"))
            .unwrap_or(NodeId::NONE);
        let find_child = |tag: &str| {
            tree.element_children(html)
                .find(|&id| tree.tag_name(id) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };
        let (head, body) = if html.is_valid() {
            (find_child("head"), find_child("body"))
        } else {
            (NodeId::NONE, NodeId::NONE)
        };

        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        self.head()
            .and_then(|head| {
                self.tree
                    .element_children(head)
                    .find(|&id| self.tree.tag_name(id) == Some("title"))
            })
            .map(|title| self.tree.text_content(title))
            .unwrap_or_default()
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// First element in document order with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
