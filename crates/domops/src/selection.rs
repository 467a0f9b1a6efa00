//! Selection - an ordered, fixed collection of elements
//!
//! A selection is resolved once, when it is built. Later changes to the
//! tree never add or remove members; a detached member stays a valid handle.

use std::ops::Index;

use domops_dom::NodeId;

use crate::{Dom, Error, OneOrMany, Result, unique};

/// Ordered element collection over a shared [`Dom`]
#[derive(Clone)]
pub struct Selection {
    dom: Dom,
    selector: Option<String>,
    contexts: Vec<NodeId>,
    elements: Vec<NodeId>,
}

/// One argument of the untyped [`Selection::from_args`] factory
#[derive(Debug, Clone)]
pub enum QueryArg {
    Selector(String),
    Node(NodeId),
    Nodes(Vec<NodeId>),
    Selection(Selection),
}

impl From<&str> for QueryArg {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for QueryArg {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for QueryArg {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<Vec<NodeId>> for QueryArg {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Nodes(nodes)
    }
}

impl From<&[NodeId]> for QueryArg {
    fn from(nodes: &[NodeId]) -> Self {
        Self::Nodes(nodes.to_vec())
    }
}

impl From<OneOrMany<NodeId>> for QueryArg {
    fn from(nodes: OneOrMany<NodeId>) -> Self {
        Self::Nodes(nodes.into_vec())
    }
}

impl From<&Selection> for QueryArg {
    fn from(selection: &Selection) -> Self {
        Self::Selection(selection.clone())
    }
}

impl QueryArg {
    /// Elements named by this argument
    ///
    /// A selection must belong to `dom`; node ids are meaningless across
    /// documents.
    pub(crate) fn into_nodes(self, dom: &Dom) -> Result<Vec<NodeId>> {
        match self {
            Self::Node(node) => Ok(vec![node]),
            Self::Nodes(nodes) => Ok(nodes),
            Self::Selection(selection) if !selection.dom.ptr_eq(dom) => {
                Err(Error::argument("selection belongs to another document"))
            }
            Self::Selection(selection) => Ok(selection.elements),
            Self::Selector(selector) => Err(Error::argument(format!(
                "unexpected selector `{selector}` after the first argument"
            ))),
        }
    }
}

impl Selection {
    /// Build a selection from a loose argument list
    ///
    /// - `[selector]` resolves against the document
    /// - `[selector, contexts]` resolves against each distinct context
    /// - `[elements...]` wraps the elements verbatim (selections are
    ///   flattened)
    ///
    /// No arguments, or a selector anywhere but first, is an
    /// [`Error::Argument`].
    pub fn from_args(dom: &Dom, args: Vec<QueryArg>) -> Result<Selection> {
        let mut args = args.into_iter();
        let Some(first) = args.next() else {
            return Err(Error::argument("no arguments passed"));
        };

        match first {
            QueryArg::Selector(selector) => {
                let contexts = match (args.next(), args.next()) {
                    (None, _) => vec![dom.root()],
                    (Some(context), None) => context.into_nodes(dom)?,
                    (Some(_), Some(_)) => {
                        return Err(Error::argument("expected a selector and one context argument"));
                    }
                };
                Self::resolve(dom, &selector, contexts)
            }
            first => {
                let mut elements = first.into_nodes(dom)?;
                for arg in args {
                    elements.extend(arg.into_nodes(dom)?);
                }
                Ok(Self::from_elements(dom, elements))
            }
        }
    }

    /// Run `selector` under each distinct context, in context order
    ///
    /// Elements reachable from two overlapping contexts appear twice.
    pub(crate) fn resolve(dom: &Dom, selector: &str, contexts: Vec<NodeId>) -> Result<Selection> {
        let contexts = unique(contexts);
        let elements = dom.read(|doc| -> Result<Vec<NodeId>> {
            let mut elements = Vec::new();
            for &context in &contexts {
                elements.extend(domops_css::query_selector_all(doc.tree(), context, selector)?);
            }
            Ok(elements)
        })?;

        tracing::debug!(
            selector,
            contexts = contexts.len(),
            elements = elements.len(),
            "resolved selection"
        );
        Ok(Self {
            dom: dom.clone(),
            selector: Some(selector.to_string()),
            contexts,
            elements,
        })
    }

    pub(crate) fn from_elements(dom: &Dom, elements: Vec<NodeId>) -> Selection {
        Self {
            dom: dom.clone(),
            selector: None,
            contexts: Vec::new(),
            elements,
        }
    }

    fn derive(&self, elements: Vec<NodeId>) -> Selection {
        Self::from_elements(&self.dom, elements)
    }

    // --- accessors ---

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Selector this selection was resolved from, if any
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Distinct context roots the selector ran under
    pub fn contexts(&self) -> &[NodeId] {
        &self.contexts
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.elements.get(index).copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.elements.iter().copied()
    }

    // --- derivations ---

    /// Resolve `selector` with the current elements as contexts
    pub fn query(&self, selector: &str) -> Result<Selection> {
        Self::resolve(&self.dom, selector, self.elements.clone())
    }

    /// Elements at the given positions, in request order
    ///
    /// Out-of-range positions are skipped; no positions gives an empty
    /// selection.
    pub fn at(&self, indices: &[usize]) -> Selection {
        self.derive(indices.iter().filter_map(|&i| self.get(i)).collect())
    }

    /// Every `n`th element, starting with the first
    ///
    /// `nth(0)` is empty.
    pub fn nth(&self, n: usize) -> Selection {
        if n == 0 {
            return self.derive(Vec::new());
        }
        self.derive(self.iter().step_by(n).collect())
    }

    /// Elements for which `predicate(element, index, all)` holds
    pub fn filter(&self, mut predicate: impl FnMut(NodeId, usize, &[NodeId]) -> bool) -> Selection {
        let kept = self
            .iter()
            .enumerate()
            .filter(|&(i, el)| predicate(el, i, &self.elements))
            .map(|(_, el)| el)
            .collect();
        self.derive(kept)
    }

    /// A selection of `transform(element, index, all)` for every element
    pub fn map(&self, mut transform: impl FnMut(NodeId, usize, &[NodeId]) -> NodeId) -> Selection {
        let mapped = self
            .iter()
            .enumerate()
            .map(|(i, el)| transform(el, i, &self.elements))
            .collect();
        self.derive(mapped)
    }

    /// Parent element of every element, each parent once, first-seen order
    pub fn parent(&self) -> Selection {
        let parents = self.dom.read(|doc| {
            let tree = doc.tree();
            unique(self.iter().filter_map(|el| tree.parent_element(el)))
        });
        self.derive(parents)
    }
}

impl Index<usize> for Selection {
    type Output = NodeId;

    fn index(&self, index: usize) -> &NodeId {
        &self.elements[index]
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter().copied()
    }
}

impl From<&Selection> for Vec<NodeId> {
    fn from(selection: &Selection) -> Self {
        selection.elements.clone()
    }
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("selector", &self.selector)
            .field("contexts", &self.contexts)
            .field("elements", &self.elements)
            .finish()
    }
}
