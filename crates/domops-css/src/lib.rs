//! domops CSS - selectors & styles
//!
//! Selector parsing and matching (`querySelectorAll`), inline style
//! declarations, and a small cascade for computed values. CSS text itself
//! is parsed by lightningcss.

mod cascade;
mod parser;
mod properties;
mod query;
mod selectors;
mod style;

pub use cascade::{Rule, StyleResolver, Stylesheet};
pub use parser::CssParser;
pub use properties::{Length, LengthUnit, ROOT_FONT_SIZE, initial_value, is_inherited};
pub use query::{closest, matches, query_selector, query_selector_all};
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, Compound, NthExpression,
    PseudoClass, SelectorComponent, SelectorList,
};
pub use style::{Declaration, StyleDeclarations, property_name};

/// Selector specificity (a, b, c)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

/// CSS errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
