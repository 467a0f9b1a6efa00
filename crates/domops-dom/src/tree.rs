//! DOM Tree (arena-based allocation)
//!
//! All structural and content mutations go through [`DomTree`] so the
//! generation counter stays accurate. Nodes are never freed.

use crate::{
    ClassList, DomError, DomResult, ElementData, ElementGeometry, EventListener, EventListeners,
    Generation, Node, NodeData, NodeId,
};

/// Tags that carry a form value
const FORM_CONTROLS: &[&str] = &["input", "textarea", "select", "option", "button"];

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    listeners: EventListeners,
    generation: Generation,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            listeners: EventListeners::new(),
            generation: Generation::INITIAL,
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Like [`get`](Self::get) but reports unknown ids as an error
    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node id ever allocated, attached or not
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Current mutation generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    fn touch(&mut self) {
        self.generation = self.generation.next();
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name))
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.get_mut(id)
            .ok_or(DomError::NotFound(id))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    // --- navigation ---

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Parent if it is an element (the document node is not)
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.to_option())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child.to_option())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.to_option())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.to_option())
    }

    /// Iterate direct children as `(id, node)` pairs
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id).unwrap_or(NodeId::NONE),
        }
    }

    /// Stable snapshot of the direct child ids
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    /// Direct children that are elements
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Ancestors of `id`, nearest first, excluding `id`
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    // --- structure ---

    /// Append `child` as the last child of `parent`, moving it out of its
    /// current parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        self.node(child)?;
        if child == NodeId::ROOT || child == parent || self.is_ancestor_of(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if self.parent(child).is_some() {
            self.detach(child)?;
        }

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;

        self.touch();
        tracing::trace!(%parent, %child, "append_child");
        Ok(child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }

        let (prev, next) = {
            let node = &mut self.nodes[child.index()];
            let links = (node.prev_sibling, node.next_sibling);
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
            links
        };
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        self.touch();
        tracing::trace!(%parent, %child, "remove_child");
        Ok(child)
    }

    /// Remove `node` from whatever parent it has
    pub fn detach(&mut self, node: NodeId) -> DomResult<NodeId> {
        let parent = self.parent(node).ok_or(DomError::NoParent(node))?;
        self.remove_child(parent, node)
    }

    /// Remove every child node, returning how many were removed
    pub fn remove_all_children(&mut self, id: NodeId) -> DomResult<usize> {
        self.node(id)?;
        let children = self.child_ids(id);
        for &child in &children {
            self.remove_child(id, child)?;
        }
        Ok(children.len())
    }

    // --- attributes ---

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.attrs.set(name, value);
        self.touch();
        tracing::trace!(node = %id, name, value, "set_attribute");
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let removed = self.element_mut(id)?.attrs.remove(name).map(|a| a.value);
        if removed.is_some() {
            self.touch();
        }
        Ok(removed)
    }

    // --- classes ---

    pub fn class_list(&self, id: NodeId) -> ClassList {
        ClassList::parse(self.get_attribute(id, "class").unwrap_or_default())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|e| e.classes().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, classes: &[&str]) -> DomResult<()> {
        let mut list = self.class_list(id);
        list.add(classes);
        self.set_attribute(id, "class", &list.value())
    }

    pub fn remove_class(&mut self, id: NodeId, classes: &[&str]) -> DomResult<()> {
        self.element_mut(id)?;
        if !self.element(id).is_some_and(|e| e.attrs.contains("class")) {
            return Ok(());
        }
        let mut list = self.class_list(id);
        list.remove(classes);
        self.set_attribute(id, "class", &list.value())
    }

    // --- content ---

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => text.content.clone(),
            Some(NodeData::Comment(comment)) => comment.clone(),
            Some(NodeData::Element(_)) | Some(NodeData::Document) => self
                .descendants(id)
                .filter_map(|d| self.get(d).and_then(Node::as_text))
                .collect(),
            _ => String::new(),
        }
    }

    /// Replace the content of a node with `text`
    ///
    /// Elements lose all children and gain a single text node (none when
    /// `text` is empty); text and comment nodes have their data replaced.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let is_element = match &mut self.get_mut(id).ok_or(DomError::NotFound(id))?.data {
            NodeData::Text(data) => {
                data.content = text.to_string();
                false
            }
            NodeData::Comment(data) => {
                *data = text.to_string();
                false
            }
            NodeData::Element(_) => true,
            NodeData::Document | NodeData::Doctype { .. } => {
                return Err(DomError::InvalidNodeType(id));
            }
        };
        if is_element {
            self.remove_all_children(id)?;
            if !text.is_empty() {
                let child = self.create_text(text);
                self.append_child(id, child)?;
            }
        }
        self.touch();
        Ok(())
    }

    /// Current form value, `None` for elements that are not form controls
    pub fn form_value(&self, id: NodeId) -> Option<String> {
        let elem = self.element(id)?;
        if !FORM_CONTROLS.contains(&elem.tag.as_str()) {
            return None;
        }
        if let Some(value) = &elem.value {
            return Some(value.clone());
        }
        Some(match elem.tag.as_str() {
            "textarea" => self.text_content(id),
            "option" => elem
                .get_attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| self.text_content(id).trim().to_string()),
            "select" => {
                let options: Vec<NodeId> = self
                    .descendants(id)
                    .filter(|&d| self.tag_name(d) == Some("option"))
                    .collect();
                options
                    .iter()
                    .find(|&&o| self.get_attribute(o, "selected").is_some())
                    .or(options.first())
                    .and_then(|&o| self.form_value(o))
                    .unwrap_or_default()
            }
            _ => elem.get_attr("value").unwrap_or_default().to_string(),
        })
    }

    /// Set the dirty form value; the `value` attribute is left untouched
    pub fn set_form_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.element_mut(id)?.value = Some(value.to_string());
        self.touch();
        Ok(())
    }

    // --- geometry ---

    pub fn geometry(&self, id: NodeId) -> Option<ElementGeometry> {
        self.element(id).map(|e| e.geometry)
    }

    /// Store layout results; does not advance the generation
    pub fn set_geometry(&mut self, id: NodeId, geometry: ElementGeometry) -> DomResult<()> {
        self.element_mut(id)?.geometry = geometry;
        Ok(())
    }

    // --- events ---

    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        listener: EventListener,
    ) -> DomResult<()> {
        self.node(id)?;
        self.listeners.add(id, event_type, listener);
        Ok(())
    }

    /// Snapshot of listeners for dispatch
    pub fn listeners(&self, id: NodeId, event_type: &str) -> Vec<EventListener> {
        self.listeners.get(id, event_type)
    }

    pub fn listener_count(&self, id: NodeId) -> usize {
        self.listeners.count(id)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Descendants<'_> {
    fn following(&self, node: NodeId) -> Option<NodeId> {
        if let Some(child) = self.tree.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        while current != self.root {
            if let Some(sibling) = self.tree.next_sibling(current) {
                return Some(sibling);
            }
            current = self.tree.parent(current)?;
        }
        None
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.following(current);
        Some(current)
    }
}

/// Iterator walking up the parent chain
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let div = tree.create_element("DIV");
        tree.append_child(tree.root(), div).unwrap();
        let kids: Vec<_> = (0..3)
            .map(|_| {
                let p = tree.create_element("p");
                tree.append_child(div, p).unwrap();
                p
            })
            .collect();
        (tree, div, kids)
    }

    #[test]
    fn test_append_and_children() {
        let (tree, div, kids) = sample();
        assert_eq!(tree.tag_name(div), Some("div"));
        assert_eq!(tree.child_ids(div), kids);
        assert_eq!(tree.parent(kids[1]), Some(div));
        assert_eq!(tree.parent_element(div), None);
    }

    #[test]
    fn test_append_moves_node() {
        let (mut tree, div, kids) = sample();
        tree.append_child(kids[0], kids[2]).unwrap();
        assert_eq!(tree.child_ids(div), vec![kids[0], kids[1]]);
        assert_eq!(tree.child_ids(kids[0]), vec![kids[2]]);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut tree, div, kids) = sample();
        let err = tree.append_child(kids[0], div).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest { .. }));
    }

    #[test]
    fn test_remove_child_relinks() {
        let (mut tree, div, kids) = sample();
        tree.remove_child(div, kids[1]).unwrap();
        assert_eq!(tree.child_ids(div), vec![kids[0], kids[2]]);
        assert_eq!(tree.prev_sibling(kids[2]), Some(kids[0]));
        assert_eq!(tree.parent(kids[1]), None);

        let err = tree.remove_child(div, kids[1]).unwrap_err();
        assert_eq!(err, DomError::NotAChild { parent: div, child: kids[1] });
    }

    #[test]
    fn test_detach_without_parent() {
        let mut tree = DomTree::new();
        let orphan = tree.create_element("span");
        assert_eq!(tree.detach(orphan), Err(DomError::NoParent(orphan)));
    }

    #[test]
    fn test_descendants_preorder() {
        let (mut tree, div, kids) = sample();
        let inner = tree.create_element("b");
        tree.append_child(kids[0], inner).unwrap();

        let order: Vec<_> = tree.descendants(div).collect();
        assert_eq!(order, vec![kids[0], inner, kids[1], kids[2]]);
        assert_eq!(tree.descendants(kids[2]).count(), 0);
    }

    #[test]
    fn test_text_content() {
        let (mut tree, div, kids) = sample();
        tree.set_text_content(kids[0], "a").unwrap();
        tree.set_text_content(kids[2], "c").unwrap();
        assert_eq!(tree.text_content(div), "ac");

        tree.set_text_content(kids[0], "").unwrap();
        assert_eq!(tree.first_child(kids[0]), None);
    }

    #[test]
    fn test_classes() {
        let (mut tree, div, _) = sample();
        tree.add_class(div, &["a", "b"]).unwrap();
        tree.add_class(div, &["a"]).unwrap();
        assert_eq!(tree.get_attribute(div, "class"), Some("a b"));
        assert!(tree.has_class(div, "b"));

        tree.remove_class(div, &["a"]).unwrap();
        assert!(!tree.has_class(div, "a"));
    }

    #[test]
    fn test_attribute_on_text_node_fails() {
        let mut tree = DomTree::new();
        let text = tree.create_text("hi");
        assert_eq!(
            tree.set_attribute(text, "id", "x"),
            Err(DomError::InvalidNodeType(text))
        );
    }

    #[test]
    fn test_form_values() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        tree.set_attribute(input, "value", "Sam").unwrap();
        assert_eq!(tree.form_value(input).as_deref(), Some("Sam"));

        tree.set_form_value(input, "Fisher").unwrap();
        assert_eq!(tree.form_value(input).as_deref(), Some("Fisher"));
        assert_eq!(tree.get_attribute(input, "value"), Some("Sam"));

        let area = tree.create_element("textarea");
        tree.set_text_content(area, "hello").unwrap();
        assert_eq!(tree.form_value(area).as_deref(), Some("hello"));

        let div = tree.create_element("div");
        assert_eq!(tree.form_value(div), None);
    }

    #[test]
    fn test_select_value() {
        let mut tree = DomTree::new();
        let select = tree.create_element("select");
        for (value, selected) in [("a", false), ("b", true)] {
            let option = tree.create_element("option");
            tree.set_attribute(option, "value", value).unwrap();
            if selected {
                tree.set_attribute(option, "selected", "").unwrap();
            }
            tree.append_child(select, option).unwrap();
        }
        assert_eq!(tree.form_value(select).as_deref(), Some("b"));
    }

    #[test]
    fn test_generation_advances_on_mutation_only() {
        let (mut tree, div, _) = sample();
        let before = tree.generation();
        tree.set_geometry(div, ElementGeometry::default()).unwrap();
        assert_eq!(tree.generation(), before);
        tree.set_attribute(div, "id", "x").unwrap();
        assert!(tree.generation() > before);
    }
}
