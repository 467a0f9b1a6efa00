//! CSS Selectors
//!
//! Parses selector lists and matches them against elements of a
//! [`DomTree`]. Matching walks right-to-left through the combinators, so a
//! selector is always evaluated against the element's full ancestor chain.

use domops_dom::{DomTree, NamedNodeMap, NodeId};

use crate::{CssError, Specificity};

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

/// Compound selectors joined by combinators
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<Compound>,
    pub combinators: Vec<Combinator>,
}

/// Sequence of simple selectors that must all match one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound(pub Vec<SelectorComponent>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// A component of a selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (lowercase tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-child(), etc.
    PseudoClass(PseudoClass),
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
    Link,
    Not(Compound),
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        let s = s.replace(' ', "");
        let n_pos = s.find('n')?;
        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };
        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() {
            0
        } else {
            rest.strip_prefix('+').unwrap_or(rest).parse().ok()?
        };
        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        // widened so extreme coefficients cannot overflow
        let (a, diff) = (i64::from(self.a), i64::from(n) - i64::from(self.b));
        if a == 0 {
            return diff == 0;
        }
        diff % a == 0 && diff / a >= 0
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some(matcher) = &self.matcher else {
            return true;
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                val.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{expected}-"))
            }
            // Empty needles never match for the substring family
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && val.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && val.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && val.contains(&fold(expected))
            }
        }
    }
}

/// Element context for selector matching
pub struct ElementContext<'a> {
    pub tag_name: &'a str,
    pub id: Option<&'a str>,
    pub attributes: &'a NamedNodeMap,
    /// Index among element siblings (1-based)
    pub sibling_index: usize,
    pub sibling_count: usize,
    /// Index among same-type siblings (1-based)
    pub type_index: usize,
    pub type_count: usize,
    pub is_root: bool,
    pub is_empty: bool,
}

impl<'a> ElementContext<'a> {
    /// Build the context for `node`; `None` if it is not an element
    pub fn new(tree: &'a DomTree, node: NodeId) -> Option<Self> {
        let elem = tree.element(node)?;
        let parent = tree.parent(node);

        let siblings: Vec<NodeId> = match parent {
            Some(p) => tree.element_children(p).collect(),
            None => vec![node],
        };
        let position = siblings.iter().position(|&s| s == node).unwrap_or(0);
        let same_type: Vec<NodeId> = siblings
            .iter()
            .copied()
            .filter(|&s| tree.tag_name(s) == Some(elem.tag.as_str()))
            .collect();
        let type_position = same_type.iter().position(|&s| s == node).unwrap_or(0);

        Some(Self {
            tag_name: &elem.tag,
            id: elem.id(),
            attributes: &elem.attrs,
            sibling_index: position + 1,
            sibling_count: siblings.len(),
            type_index: type_position + 1,
            type_count: same_type.len(),
            is_root: parent == Some(tree.root()),
            is_empty: tree
                .children(node)
                .all(|(_, child)| !child.is_element() && !child.is_text()),
        })
    }

    fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    fn is_form_control(&self) -> bool {
        matches!(
            self.tag_name,
            "input" | "button" | "select" | "textarea" | "option" | "optgroup" | "fieldset"
        )
    }
}

/// Match a selector component against an element
pub fn match_component(component: &SelectorComponent, element: &ElementContext) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => element.tag_name.eq_ignore_ascii_case(tag),
        SelectorComponent::Id(id) => element.id == Some(id.as_str()),
        SelectorComponent::Class(class) => element
            .attributes
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class)),
        SelectorComponent::Attribute(attr) => attr.matches(element.attributes.get(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, element),
    }
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class(pseudo: &PseudoClass, element: &ElementContext) -> bool {
    match pseudo {
        PseudoClass::Root => element.is_root,
        PseudoClass::Empty => element.is_empty,
        PseudoClass::FirstChild => element.sibling_index == 1,
        PseudoClass::LastChild => element.sibling_index == element.sibling_count,
        PseudoClass::OnlyChild => element.sibling_count == 1,
        PseudoClass::FirstOfType => element.type_index == 1,
        PseudoClass::LastOfType => element.type_index == element.type_count,
        PseudoClass::OnlyOfType => element.type_count == 1,
        PseudoClass::NthChild(expr) => expr.matches(element.sibling_index as i32),
        PseudoClass::NthLastChild(expr) => {
            let from_end = element.sibling_count - element.sibling_index + 1;
            expr.matches(from_end as i32)
        }
        PseudoClass::NthOfType(expr) => expr.matches(element.type_index as i32),
        PseudoClass::NthLastOfType(expr) => {
            let from_end = element.type_count - element.type_index + 1;
            expr.matches(from_end as i32)
        }
        PseudoClass::Checked => {
            element.has_attr("checked")
                || (element.tag_name == "option" && element.has_attr("selected"))
        }
        PseudoClass::Disabled => element.is_form_control() && element.has_attr("disabled"),
        PseudoClass::Enabled => element.is_form_control() && !element.has_attr("disabled"),
        PseudoClass::Required => element.is_form_control() && element.has_attr("required"),
        PseudoClass::Optional => element.is_form_control() && !element.has_attr("required"),
        PseudoClass::Link => {
            matches!(element.tag_name, "a" | "area") && element.has_attr("href")
        }
        PseudoClass::Not(compound) => !compound.matches_context(element),
    }
}

impl Compound {
    fn matches_context(&self, element: &ElementContext) -> bool {
        self.0.iter().all(|c| match_component(c, element))
    }

    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        ElementContext::new(tree, node).is_some_and(|ctx| self.matches_context(&ctx))
    }

    fn specificity(&self) -> Specificity {
        let mut total = Specificity::default();
        for component in &self.0 {
            match component {
                SelectorComponent::Id(_) => total.0 += 1,
                // :not() counts as its argument
                SelectorComponent::PseudoClass(PseudoClass::Not(inner)) => {
                    let inner = inner.specificity();
                    total.0 += inner.0;
                    total.1 += inner.1;
                    total.2 += inner.2;
                }
                SelectorComponent::Class(_)
                | SelectorComponent::Attribute(_)
                | SelectorComponent::PseudoClass(_) => total.1 += 1,
                SelectorComponent::Type(_) => total.2 += 1,
                SelectorComponent::Universal => {}
            }
        }
        total
    }
}

impl ComplexSelector {
    /// Check whether `node` matches this selector
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_from(tree, node, n - 1),
        }
    }

    fn matches_from(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let next = index - 1;
        match self.combinators[next] {
            Combinator::Child => tree
                .parent_element(node)
                .is_some_and(|parent| self.matches_from(tree, parent, next)),
            Combinator::Descendant => tree
                .ancestors(node)
                .filter(|&a| tree.is_element(a))
                .any(|a| self.matches_from(tree, a, next)),
            Combinator::NextSibling => previous_elements(tree, node)
                .next()
                .is_some_and(|sibling| self.matches_from(tree, sibling, next)),
            Combinator::SubsequentSibling => {
                previous_elements(tree, node).any(|sibling| self.matches_from(tree, sibling, next))
            }
        }
    }

    pub fn specificity(&self) -> Specificity {
        self.compounds.iter().fold(Specificity::default(), |acc, c| {
            let s = c.specificity();
            Specificity(acc.0 + s.0, acc.1 + s.1, acc.2 + s.2)
        })
    }
}

fn previous_elements(tree: &DomTree, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(tree.prev_sibling(node), |&s| tree.prev_sibling(s))
        .filter(|&s| tree.is_element(s))
}

impl SelectorList {
    /// Parse a selector list such as `"#header h1, form > input[name=email]"`
    pub fn parse(input: &str) -> Result<Self, CssError> {
        SelectorParser::new(input).parse_list()
    }

    /// Check whether any selector in the list matches `node`
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(tree, node))
    }

    /// All descendants of `root` matching the list, in document order
    pub fn query_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .filter(|&node| self.matches(tree, node))
            .collect()
    }

    /// Highest specificity among the selectors that match `node`
    pub fn matching_specificity(&self, tree: &DomTree, node: NodeId) -> Option<Specificity> {
        self.0
            .iter()
            .filter(|s| s.matches(tree, node))
            .map(ComplexSelector::specificity)
            .max()
    }
}

/// Hand-written recursive-descent selector parser
struct SelectorParser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> CssError {
        CssError::InvalidSelector {
            selector: self.source.to_string(),
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), CssError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{c}` at offset {}", self.pos)))
        }
    }

    /// Skip whitespace, reporting whether any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Result<SelectorList, CssError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            }
        }
        Ok(SelectorList(selectors))
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, CssError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound, CssError> {
        let mut components = Vec::new();

        if self.eat('*') {
            components.push(SelectorComponent::Universal);
        } else if self.peek().is_some_and(is_ident_start) {
            components.push(SelectorComponent::Type(self.parse_ident()?.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    self.pos += 1;
                    if self.peek() == Some(':') {
                        return Err(self.error("pseudo-elements never match elements"));
                    }
                    components.push(SelectorComponent::PseudoClass(self.parse_pseudo()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            let message = match self.peek() {
                Some(c) => format!("unexpected `{c}` at offset {}", self.pos),
                None => "empty selector".to_string(),
            };
            return Err(self.error(message));
        }
        Ok(Compound(components))
    }

    fn parse_ident(&mut self) -> Result<String, CssError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                match self.bump() {
                    Some(escaped) => ident.push(escaped),
                    None => return Err(self.error("dangling escape")),
                }
            } else if is_ident_char(c) {
                ident.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.error(format!("expected identifier at offset {}", self.pos)));
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, CssError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector {
                name,
                matcher: None,
                case_insensitive: false,
            });
        }

        let operator = match (self.peek(), self.peek_at(1)) {
            (Some('='), _) => {
                self.pos += 1;
                '='
            }
            (Some(op @ ('~' | '|' | '^' | '$' | '*')), Some('=')) => {
                self.pos += 2;
                op
            }
            _ => return Err(self.error("malformed attribute selector")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => break,
                        Some('\\') => {
                            if let Some(escaped) = self.bump() {
                                value.push(escaped);
                            }
                        }
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                value
            }
            _ => self.parse_ident()?,
        };

        self.skip_whitespace();
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.pos += 1;
                true
            }
            Some('s' | 'S') => {
                self.pos += 1;
                false
            }
            _ => false,
        };
        self.skip_whitespace();
        self.expect(']')?;

        let matcher = match operator {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, CssError> {
        let name = self.parse_ident()?.to_ascii_lowercase();

        if self.eat('(') {
            let argument = self.parse_argument()?;
            let nth = |arg: &str| {
                NthExpression::parse(arg)
                    .ok_or_else(|| self.error(format!("invalid An+B expression `{arg}`")))
            };
            return match name.as_str() {
                "nth-child" => Ok(PseudoClass::NthChild(nth(&argument)?)),
                "nth-last-child" => Ok(PseudoClass::NthLastChild(nth(&argument)?)),
                "nth-of-type" => Ok(PseudoClass::NthOfType(nth(&argument)?)),
                "nth-last-of-type" => Ok(PseudoClass::NthLastOfType(nth(&argument)?)),
                "not" => {
                    let mut inner = SelectorParser::new(&argument);
                    inner.skip_whitespace();
                    let compound = inner.parse_compound()?;
                    inner.skip_whitespace();
                    if inner.peek().is_some() {
                        return Err(self.error(":not() takes a single compound selector"));
                    }
                    Ok(PseudoClass::Not(compound))
                }
                _ => Err(self.error(format!("unsupported pseudo-class `:{name}()`"))),
            };
        }

        Ok(match name.as_str() {
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "required" => PseudoClass::Required,
            "optional" => PseudoClass::Optional,
            "link" | "any-link" => PseudoClass::Link,
            _ => return Err(self.error(format!("unsupported pseudo-class `:{name}`"))),
        })
    }

    /// Raw text up to the matching `)`
    fn parse_argument(&mut self) -> Result<String, CssError> {
        let mut depth = 1;
        let mut argument = String::new();
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(argument);
                    }
                }
                _ => {}
            }
            argument.push(c);
        }
        Err(self.error("unbalanced parentheses"))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}
