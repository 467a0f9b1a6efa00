//! CSS Parser using lightningcss
//!
//! Stylesheets and declaration blocks are tokenized and validated by
//! lightningcss, then converted into our [`Rule`] and [`Declaration`] form
//! with values serialized back to text.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleAttribute, StyleSheet};
use lightningcss::traits::ToCss;

use crate::cascade::expand_shorthand;
use crate::{CssError, Declaration, Rule, SelectorList, Stylesheet};

/// CSS Parser
#[derive(Debug, Clone, Copy, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a stylesheet
    ///
    /// Invalid declarations and rules are dropped as browsers drop them.
    /// Only plain style rules are kept; at-rules are skipped.
    pub fn parse_stylesheet(&self, css: &str) -> Result<Stylesheet, CssError> {
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        let stylesheet = StyleSheet::parse(css, options).map_err(|e| CssError::ParseError {
            line: e.loc.as_ref().map_or(0, |loc| loc.line + 1),
            message: e.kind.to_string(),
        })?;

        let mut result = Stylesheet::new();
        for rule in stylesheet.rules.0.iter() {
            if let Some(converted) = self.convert_rule(rule) {
                result.rules.push(converted);
            }
        }

        tracing::debug!(rules = result.rules.len(), "parsed stylesheet");
        Ok(result)
    }

    /// Parse a `style` attribute, dropping malformed entries
    pub fn parse_declarations(&self, input: &str) -> Vec<Declaration> {
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        match StyleAttribute::parse(input, options) {
            Ok(attribute) => self.convert_declarations(&attribute.declarations),
            Err(err) => {
                tracing::warn!(%err, "ignoring style attribute");
                Vec::new()
            }
        }
    }

    /// Parse exactly one `property: value [!important]` entry
    ///
    /// Anything else, including a value smuggling in a second
    /// declaration, yields `None`.
    pub fn parse_declaration(&self, input: &str) -> Option<Declaration> {
        let block = DeclarationBlock::parse_string(input, ParserOptions::default()).ok()?;
        let mut declarations = self.convert_declarations(&block);
        match declarations.len() {
            1 => declarations.pop(),
            _ => None,
        }
    }

    fn convert_rule(&self, rule: &CssRule) -> Option<Rule> {
        match rule {
            CssRule::Style(style_rule) => {
                let text = ToCss::to_css_string(&style_rule.selectors, PrinterOptions::default())
                    .ok()?;
                let selectors = match SelectorList::parse(&text) {
                    Ok(selectors) => selectors,
                    Err(err) => {
                        tracing::warn!(%err, "skipping style rule");
                        return None;
                    }
                };
                let declarations = self
                    .convert_declarations(&style_rule.declarations)
                    .into_iter()
                    .flat_map(expand_shorthand)
                    .collect();
                Some(Rule { selectors, declarations })
            }
            _ => None,
        }
    }

    fn convert_declarations(&self, block: &DeclarationBlock) -> Vec<Declaration> {
        let normal = block.declarations.iter().map(|p| (p, false));
        let important = block.important_declarations.iter().map(|p| (p, true));
        normal
            .chain(important)
            .filter_map(|(property, important)| self.convert_declaration(property, important))
            .collect()
    }

    fn convert_declaration(&self, property: &Property, important: bool) -> Option<Declaration> {
        let name = property.property_id().name().to_string();
        match property.value_to_css_string(PrinterOptions::default()) {
            Ok(value) => Some(Declaration {
                property: name,
                value,
                important,
            }),
            Err(err) => {
                tracing::warn!(property = %name, %err, "dropping declaration");
                None
            }
        }
    }
}
