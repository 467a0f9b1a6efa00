//! Style Cascade & Resolver
//!
//! Computes style values for DOM elements by:
//! 1. Matching author rules from `<style>` elements
//! 2. Sorting by importance, origin, specificity and source order
//! 3. Falling back to inheritance, user-agent defaults and initial values

use std::collections::HashMap;

use domops_dom::{DomTree, NodeId};

use crate::properties::{box_longhands, expand_box_values, initial_value, is_inherited};
use crate::{
    CssError, CssParser, Declaration, SelectorList, Specificity, StyleDeclarations, property_name,
};

/// A style rule
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selectors: SelectorList,
    pub declarations: Vec<Declaration>,
}

/// CSS Stylesheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stylesheet
    ///
    /// Comments and at-rules are skipped. A rule whose selector is not
    /// supported is dropped with a warning.
    pub fn parse(css: &str) -> Result<Self, CssError> {
        CssParser::new().parse_stylesheet(css)
    }
}

/// Expand box shorthands (`margin`, `padding`, ...) into longhands
pub(crate) fn expand_shorthand(declaration: Declaration) -> Vec<Declaration> {
    let expanded = box_longhands(&declaration.property)
        .zip(expand_box_values(&declaration.value));
    match expanded {
        Some((names, values)) => names
            .into_iter()
            .zip(values)
            .map(|(property, value)| Declaration {
                property: property.to_string(),
                value,
                important: declaration.important,
            })
            .collect(),
        None => vec![declaration],
    }
}

/// Tags that are blocks by default
const BLOCK_ELEMENTS: &[&str] = &[
    "html", "body", "address", "article", "aside", "blockquote", "dd", "details", "dialog",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre",
    "section", "summary", "ul",
];

/// Tags that never render
const HIDDEN_ELEMENTS: &[&str] = &[
    "head", "script", "style", "link", "meta", "title", "template", "noscript", "base",
];

/// User-agent `display` for an element
fn ua_display(tree: &DomTree, node: NodeId) -> &'static str {
    let Some(elem) = tree.element(node) else {
        return "inline";
    };
    let tag = elem.tag.as_str();
    if elem.attrs.contains("hidden") || HIDDEN_ELEMENTS.contains(&tag) {
        "none"
    } else if BLOCK_ELEMENTS.contains(&tag) {
        "block"
    } else {
        match tag {
            "li" => "list-item",
            "table" => "table",
            "tr" => "table-row",
            "td" | "th" => "table-cell",
            "thead" => "table-header-group",
            "tbody" => "table-row-group",
            "tfoot" => "table-footer-group",
            "input" | "button" | "select" | "textarea" => "inline-block",
            _ => "inline",
        }
    }
}

/// Style resolver - computes style values for DOM elements
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    /// Author stylesheets in document order
    author_styles: Vec<Stylesheet>,
}

impl StyleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `<style>` element of the tree, in document order
    pub fn from_tree(tree: &DomTree) -> Self {
        let mut resolver = Self::new();
        let styles = tree
            .descendants(tree.root())
            .filter(|&node| tree.tag_name(node) == Some("style"));
        for style in styles {
            match Stylesheet::parse(&tree.text_content(style)) {
                Ok(sheet) => resolver.add_stylesheet(sheet),
                Err(err) => tracing::warn!(%err, node = %style, "ignoring stylesheet"),
            }
        }
        resolver
    }

    /// Add an author stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: Stylesheet) {
        self.author_styles.push(stylesheet);
    }

    pub fn rule_count(&self) -> usize {
        self.author_styles.iter().map(|s| s.rules.len()).sum()
    }

    /// Winning declared values for an element, before inheritance
    pub fn cascaded_style(&self, tree: &DomTree, node: NodeId) -> HashMap<String, String> {
        // (important, inline, specificity, source order)
        type Weight = (bool, bool, Specificity, usize);
        let mut winners: HashMap<String, (Weight, String)> = HashMap::new();
        let mut consider = |declaration: Declaration, weight: Weight| {
            let beats = winners
                .get(&declaration.property)
                .is_none_or(|(current, _)| weight >= *current);
            if beats {
                winners.insert(declaration.property, (weight, declaration.value));
            }
        };

        let mut order = 0;
        for rule in self.author_styles.iter().flat_map(|s| &s.rules) {
            if let Some(specificity) = rule.selectors.matching_specificity(tree, node) {
                for declaration in &rule.declarations {
                    order += 1;
                    consider(
                        declaration.clone(),
                        (declaration.important, false, specificity, order),
                    );
                }
            }
        }

        if let Some(inline) = tree.get_attribute(node, "style") {
            for declaration in StyleDeclarations::parse(inline).iter().cloned() {
                for declaration in expand_shorthand(declaration) {
                    order += 1;
                    let important = declaration.important;
                    consider(declaration, (important, true, Specificity::default(), order));
                }
            }
        }

        winners
            .into_iter()
            .map(|(property, (_, value))| (property, value))
            .collect()
    }

    /// Computed value of `property` for `node`
    ///
    /// Always a string; unknown properties without a declaration give `""`.
    pub fn computed_value(&self, tree: &DomTree, node: NodeId, property: &str) -> String {
        let property = property_name(property);
        self.computed_property(tree, node, &property)
    }

    fn computed_property(&self, tree: &DomTree, node: NodeId, property: &str) -> String {
        let declared = if tree.is_element(node) {
            self.cascaded_style(tree, node).remove(property)
        } else {
            None
        };

        match declared.as_deref().map(str::trim) {
            Some("inherit") => self.inherited(tree, node, property),
            Some("initial") => self.default_value(tree, node, property),
            Some(value) if !value.is_empty() => value.to_string(),
            _ if is_inherited(property) || !tree.is_element(node) => {
                self.inherited(tree, node, property)
            }
            _ => self.default_value(tree, node, property),
        }
    }

    fn inherited(&self, tree: &DomTree, node: NodeId, property: &str) -> String {
        match tree.parent_element(node) {
            Some(parent) => self.computed_property(tree, parent, property),
            None => self.default_value(tree, node, property),
        }
    }

    fn default_value(&self, tree: &DomTree, node: NodeId, property: &str) -> String {
        if property == "display" {
            ua_display(tree, node).to_string()
        } else {
            initial_value(property).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(tag: &str) -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let parent = tree.create_element("div");
        let child = tree.create_element(tag);
        tree.append_child(tree.root(), parent).unwrap();
        tree.append_child(parent, child).unwrap();
        (tree, parent, child)
    }

    #[test]
    fn test_parse_stylesheet() {
        let sheet = Stylesheet::parse(
            "/* header */\n@import url(x.css);\n@media print { p { color: red } }\n\
             #a, .b { color: red !important; margin: 1px 2px }\np:hover { color: red }",
        )
        .unwrap();
        // `:hover` is not supported, so that rule is dropped
        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selectors.0.len(), 2);
        assert_eq!(rule.declarations.len(), 5);
        // important declarations follow the normal ones
        assert_eq!(rule.declarations[1].property, "margin-right");
        assert_eq!(rule.declarations[1].value, "2px");
        assert_eq!(rule.declarations[4].property, "color");
        assert!(rule.declarations[4].important);
    }

    #[test]
    fn test_braces_in_strings_and_comments() {
        let sheet = Stylesheet::parse(
            "p::before { content: \"} div {\" }\n/* } */\nli { width: 4px }",
        )
        .unwrap();
        // `::before` is dropped; the brace in the string does not end the rule
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].value, "4px");
    }

    #[test]
    fn test_specificity_and_inline() {
        let (mut tree, parent, child) = tree_with("p");
        tree.set_attribute(child, "class", "x").unwrap();

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(
            Stylesheet::parse(".x { color: green } p { color: red } div p { width: 5px }").unwrap(),
        );
        assert_eq!(resolver.computed_value(&tree, child, "color"), "green");
        assert_eq!(resolver.computed_value(&tree, child, "width"), "5px");

        tree.set_attribute(child, "style", "color: orange").unwrap();
        assert_eq!(resolver.computed_value(&tree, child, "color"), "orange");

        // parent gets nothing from `div p`
        assert_eq!(resolver.computed_value(&tree, parent, "width"), "auto");
    }

    #[test]
    fn test_important_beats_inline() {
        let (mut tree, _, child) = tree_with("p");
        tree.set_attribute(child, "style", "color: green").unwrap();
        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(Stylesheet::parse("p { color: red !important }").unwrap());
        assert_eq!(resolver.computed_value(&tree, child, "color"), "red");
    }

    #[test]
    fn test_inheritance_and_defaults() {
        let (mut tree, parent, child) = tree_with("span");
        tree.set_attribute(parent, "style", "color: teal; margin-top: 3px").unwrap();
        let resolver = StyleResolver::new();

        assert_eq!(resolver.computed_value(&tree, child, "color"), "teal");
        assert_eq!(resolver.computed_value(&tree, child, "marginTop"), "0px");
        assert_eq!(resolver.computed_value(&tree, child, "display"), "inline");
        assert_eq!(resolver.computed_value(&tree, parent, "display"), "block");

        tree.set_attribute(child, "hidden", "").unwrap();
        assert_eq!(resolver.computed_value(&tree, child, "display"), "none");
    }

    #[test]
    fn test_inline_shorthand_expands() {
        let (mut tree, _, child) = tree_with("p");
        tree.set_attribute(child, "style", "padding: 1px 2px 3px").unwrap();
        let resolver = StyleResolver::new();
        assert_eq!(resolver.computed_value(&tree, child, "padding-left"), "2px");
        assert_eq!(resolver.computed_value(&tree, child, "padding-bottom"), "3px");
    }

    #[test]
    fn test_from_tree_reads_style_elements() {
        let (mut tree, parent, child) = tree_with("p");
        let style = tree.create_element("style");
        let css = tree.create_text("p { display: none }");
        tree.append_child(style, css).unwrap();
        tree.append_child(parent, style).unwrap();

        let resolver = StyleResolver::from_tree(&tree);
        assert_eq!(resolver.rule_count(), 1);
        assert_eq!(resolver.computed_value(&tree, child, "display"), "none");
    }
}
