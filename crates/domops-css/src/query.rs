//! `querySelector`-style entry points over a [`DomTree`]

use domops_dom::{DomTree, NodeId};

use crate::{CssError, SelectorList};

/// All descendants of `root` matching `selector`, in document order
pub fn query_selector_all(
    tree: &DomTree,
    root: NodeId,
    selector: &str,
) -> Result<Vec<NodeId>, CssError> {
    let list = SelectorList::parse(selector)?;
    let found = list.query_all(tree, root);
    tracing::trace!(selector, %root, count = found.len(), "query_selector_all");
    Ok(found)
}

/// First descendant of `root` matching `selector`
pub fn query_selector(
    tree: &DomTree,
    root: NodeId,
    selector: &str,
) -> Result<Option<NodeId>, CssError> {
    let list = SelectorList::parse(selector)?;
    Ok(tree.descendants(root).find(|&node| list.matches(tree, node)))
}

/// Whether `node` itself matches `selector`
pub fn matches(tree: &DomTree, node: NodeId, selector: &str) -> Result<bool, CssError> {
    Ok(SelectorList::parse(selector)?.matches(tree, node))
}

/// Nearest inclusive ancestor of `node` matching `selector`
pub fn closest(tree: &DomTree, node: NodeId, selector: &str) -> Result<Option<NodeId>, CssError> {
    let list = SelectorList::parse(selector)?;
    Ok(std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&n| list.matches(tree, n)))
}
