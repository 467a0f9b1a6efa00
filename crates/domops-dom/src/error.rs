//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not exist in this tree
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// Inserting a node into itself or one of its descendants
    #[error("hierarchy request error: {child} cannot be inserted into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Operation requires an element
    #[error("node {0} is not an element")]
    InvalidNodeType(NodeId),
    /// `remove_child` with a node that has another parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Detaching a node that is not attached anywhere
    #[error("node {0} has no parent")]
    NoParent(NodeId),
}
