//! Class, event and tree mutation

use std::rc::Rc;

use domops_dom::{DomError, Event, EventListener, NodeId};

use crate::{QueryArg, Result, Selection};

/// A child for [`Selection::attach`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(NodeId),
    /// Appended as a new text node
    Text(String),
}

impl From<NodeId> for Child {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl Selection {
    // --- classes ---

    pub fn add_class(&self, classes: &[&str]) -> Result<&Self> {
        tracing::trace!(?classes, count = self.len(), "add class");
        self.dom().write(|doc| -> Result<()> {
            for el in self.iter() {
                doc.tree_mut().add_class(el, classes)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    pub fn remove_class(&self, classes: &[&str]) -> Result<&Self> {
        tracing::trace!(?classes, count = self.len(), "remove class");
        self.dom().write(|doc| -> Result<()> {
            for el in self.iter() {
                doc.tree_mut().remove_class(el, classes)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    pub fn has_class(&self, class: &str) -> Vec<bool> {
        self.dom()
            .read(|doc| self.iter().map(|el| doc.tree().has_class(el, class)).collect())
    }

    // --- events ---

    /// Register `handler` for every whitespace-separated event name
    ///
    /// All registrations share one handler.
    pub fn on(&self, events: &str, handler: impl Fn(&mut Event) + 'static) -> Result<&Self> {
        let handler: EventListener = Rc::new(handler);
        for el in self.iter() {
            for event in events.split_whitespace() {
                self.dom().add_listener(el, event, Rc::clone(&handler))?;
            }
        }
        Ok(self)
    }

    /// Call `f(element, index, all)` for every element
    pub fn for_each(&self, mut f: impl FnMut(NodeId, usize, &[NodeId])) -> &Self {
        for (i, el) in self.iter().enumerate() {
            f(el, i, self.elements());
        }
        self
    }

    // --- tree ---

    /// Append every element, in order, to `parent`
    ///
    /// A selection as the parent means its first element; it must come
    /// from the same document.
    pub fn attach_to(&self, parent: impl Into<QueryArg>) -> Result<&Self> {
        let parent = parent
            .into()
            .into_nodes(self.dom())?
            .first()
            .copied()
            .ok_or(DomError::NotFound(NodeId::NONE))?;

        self.dom().write(|doc| -> Result<()> {
            for el in self.iter() {
                doc.tree_mut().append_child(parent, el)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Append `children` to the first element
    ///
    /// On an empty selection the node children are detached from their
    /// parents instead and text children are ignored.
    pub fn attach(&self, children: impl IntoIterator<Item = Child>) -> Result<&Self> {
        let children: Vec<Child> = children.into_iter().collect();
        self.dom().write(|doc| -> Result<()> {
            let tree = doc.tree_mut();
            match self.first() {
                Some(parent) => {
                    for child in children {
                        let node = match child {
                            Child::Node(node) => node,
                            Child::Text(text) => tree.create_text(&text),
                        };
                        tree.append_child(parent, node)?;
                    }
                }
                None => {
                    for child in children {
                        if let Child::Node(node) = child
                            && tree.parent(node).is_some()
                        {
                            tree.detach(node)?;
                        }
                    }
                }
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Remove every element from its parent
    ///
    /// The selection keeps its members.
    pub fn detach(&self) -> Result<&Self> {
        tracing::trace!(count = self.len(), "detach");
        self.dom().write(|doc| -> Result<()> {
            for el in self.iter() {
                doc.tree_mut().detach(el)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Remove all child nodes of every element
    pub fn empty(&self) -> Result<&Self> {
        self.dom().write(|doc| -> Result<()> {
            for el in self.iter() {
                let removed = doc.tree_mut().remove_all_children(el)?;
                tracing::trace!(%el, removed, "emptied");
            }
            Ok(())
        })?;
        Ok(self)
    }

    // --- display ---

    /// Set inline `display`, or drop the inline override when `None`
    pub fn show(&self, display: Option<&str>) -> Result<&Self> {
        self.set_style("display", display.unwrap_or(""))
    }

    pub fn hide(&self) -> Result<&Self> {
        self.set_style("display", "none")
    }
}
