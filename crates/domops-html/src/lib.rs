//! domops HTML
//!
//! HTML5 parsing built on html5ever, plus innerHTML/outerHTML serialization.

mod parser;
mod serializer;

use domops_dom::{Document, DomError, DomTree, NodeId};

pub use parser::HtmlParser;
pub use serializer::{HtmlSerializer, inner_html, outer_html};

/// Parse an HTML string into a [`Document`]
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse an HTML string into a [`Document`] with the given URL
pub fn parse_with_url(html: &str, url: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse_with_url(html, url)
}

/// Parse a fragment into detached nodes of `tree`
pub fn parse_fragment(tree: &mut DomTree, html: &str) -> Result<Vec<NodeId>, HtmlError> {
    HtmlParser::new().parse_fragment(tree, html)
}

/// HTML errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build tree: {0}")]
    Dom(#[from] DomError),
}
