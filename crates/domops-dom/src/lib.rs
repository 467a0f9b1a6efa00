//! domops DOM - Document Object Model
//!
//! Arena-allocated DOM tree. Nodes are addressed by [`NodeId`] and are never
//! freed, so an id stays valid after its node is detached from the tree.

mod attributes;
mod classlist;
mod document;
mod error;
mod events;
mod generation;
mod geometry;
mod node;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::ClassList;
pub use document::Document;
pub use error::{DomError, DomResult};
pub use events::{Event, EventListener, EventListeners};
pub use generation::Generation;
pub use geometry::{ElementGeometry, Rect};
pub use node::{ElementData, Node, NodeData, TextData};
pub use tree::{Ancestors, Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node" in sibling/parent links
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Position of the node in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
