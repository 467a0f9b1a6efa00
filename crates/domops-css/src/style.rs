//! Inline style declarations
//!
//! The `style` attribute as an ordered list of declarations. Parsing is
//! lenient: malformed entries are dropped, as browsers do.

use std::fmt;

use crate::CssParser;

/// A single `property: value [!important]` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    /// Parse one `name: value` entry
    ///
    /// Input holding more than one declaration is rejected.
    pub fn parse(input: &str) -> Option<Self> {
        CssParser::new().parse_declaration(input)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// Ordered declaration block, one entry per property
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDeclarations {
    declarations: Vec<Declaration>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration block such as a `style` attribute
    pub fn parse(input: &str) -> Self {
        let mut block = Self::new();
        for declaration in CssParser::new().parse_declarations(input) {
            block.push(declaration);
        }
        block
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn get(&self, property: &str) -> Option<&Declaration> {
        let property = property_name(property);
        self.declarations.iter().find(|d| d.property == property)
    }

    /// Value of `property`, or `""` when unset
    pub fn value(&self, property: &str) -> &str {
        self.get(property).map(|d| d.value.as_str()).unwrap_or("")
    }

    /// Set `property`; an empty value removes it
    ///
    /// An existing declaration keeps its position. A value that does not
    /// parse as a single declaration of `property` leaves the block
    /// untouched and returns `false`.
    pub fn set(&mut self, property: &str, value: &str) -> bool {
        let property = property_name(property);
        let value = value.trim();
        if value.is_empty() {
            self.remove(&property);
            return true;
        }
        match Declaration::parse(&format!("{property}: {value}")) {
            Some(declaration) if declaration.property == property => {
                self.push(declaration);
                true
            }
            _ => {
                tracing::debug!(%property, value, "ignoring invalid style value");
                false
            }
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<Declaration> {
        let property = property_name(property);
        let index = self.declarations.iter().position(|d| d.property == property)?;
        Some(self.declarations.remove(index))
    }

    fn push(&mut self, declaration: Declaration) {
        match self
            .declarations
            .iter_mut()
            .find(|d| d.property == declaration.property)
        {
            Some(existing) => *existing = declaration,
            None => self.declarations.push(declaration),
        }
    }
}

impl fmt::Display for StyleDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, declaration) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{declaration};")?;
        }
        Ok(())
    }
}

/// Normalise a property name to its CSS (kebab-case) form
///
/// Accepts camelCase names (`backgroundColor`), `cssFloat` and custom
/// properties (`--accent`), which keep their case.
pub fn property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }
    if name == "cssFloat" {
        return "float".to_string();
    }

    let mut result = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_name() {
        assert_eq!(property_name("backgroundColor"), "background-color");
        assert_eq!(property_name("border-top-width"), "border-top-width");
        assert_eq!(property_name("cssFloat"), "float");
        assert_eq!(property_name("--mainColor"), "--mainColor");
    }

    #[test]
    fn test_parse_block() {
        let block = StyleDeclarations::parse(
            "color: red; background: url('a;b.png'); width:10px !important;; bogus",
        );
        assert_eq!(block.len(), 3);
        assert_eq!(block.value("color"), "red");
        assert!(block.value("background").contains("a;b.png"));
        let width = block.get("width").unwrap();
        assert_eq!(width.value, "10px");
        assert!(width.important);
    }

    #[test]
    fn test_set_keeps_position_and_empty_removes() {
        let mut block = StyleDeclarations::parse("color: red; display: block");
        assert!(block.set("color", "green"));
        assert!(block.set("marginTop", "4px"));
        assert_eq!(block.to_string(), "color: green; display: block; margin-top: 4px;");

        assert!(block.set("display", ""));
        assert_eq!(block.to_string(), "color: green; margin-top: 4px;");
        assert_eq!(block.value("display"), "");
    }

    #[test]
    fn test_set_rejects_smuggled_declarations() {
        let mut block = StyleDeclarations::parse("color: green");
        assert!(!block.set("color", "red; display: none"));
        assert!(!block.set("width", "1px; height: 2px"));
        assert_eq!(block.to_string(), "color: green;");
        assert_eq!(block.value("display"), "");
    }

    #[test]
    fn test_important_round_trips() {
        let block = StyleDeclarations::parse("color: red!important");
        assert_eq!(block.to_string(), "color: red !important;");
    }
}
