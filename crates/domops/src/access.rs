//! Get/set accessors
//!
//! Attributes, `data-*` attributes and style share one three-way contract:
//! get a value per element, set one pair on every element, or set many
//! pairs on every element. Text, markup and form values are read per
//! element and set from a literal or a per-element callback.

use domops_css::{StyleDeclarations, StyleResolver};
use domops_dom::{DomTree, NodeId};

use crate::{Error, Result, Selection};

/// One argument of an untyped accessor call
#[derive(Debug, Clone, PartialEq)]
pub enum AccessArg {
    Str(String),
    Map(Vec<(String, String)>),
}

impl From<&str> for AccessArg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AccessArg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<(String, String)>> for AccessArg {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Map(pairs)
    }
}

impl From<&[(&str, &str)]> for AccessArg {
    fn from(pairs: &[(&str, &str)]) -> Self {
        Self::Map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Which accessor mode a call selects
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Get(String),
    Set(String, String),
    SetMany(Vec<(String, String)>),
}

impl Access {
    /// Pick the mode from an argument list
    ///
    /// One name gets, one map sets many, a name and a value set one.
    /// Anything else is an [`Error::Argument`].
    pub fn from_args(args: &[AccessArg]) -> Result<Self> {
        match args {
            [] => Err(Error::argument("no arguments")),
            [AccessArg::Str(name)] => Ok(Self::Get(name.clone())),
            [AccessArg::Map(pairs)] => Ok(Self::SetMany(pairs.clone())),
            [AccessArg::Str(name), AccessArg::Str(value)] => {
                Ok(Self::Set(name.clone(), value.clone()))
            }
            [_, _] => Err(Error::argument("expected a name and a string value")),
            _ => Err(Error::argument(format!(
                "expected at most 2 arguments, got {}",
                args.len()
            ))),
        }
    }
}

/// Result of a dispatched accessor: values, or the selection for chaining
#[derive(Debug)]
pub enum Accessed<'a, T> {
    Values(Vec<T>),
    Selection(&'a Selection),
}

impl<'a, T> Accessed<'a, T> {
    pub fn values(self) -> Option<Vec<T>> {
        match self {
            Self::Values(values) => Some(values),
            Self::Selection(_) => None,
        }
    }

    pub fn selection(self) -> Option<&'a Selection> {
        match self {
            Self::Values(_) => None,
            Self::Selection(selection) => Some(selection),
        }
    }
}

fn data_name(name: &str) -> String {
    format!("data-{name}")
}

fn write_inline_style(tree: &mut DomTree, node: NodeId, pairs: &[(&str, &str)]) -> Result<()> {
    let mut block = StyleDeclarations::parse(tree.get_attribute(node, "style").unwrap_or(""));
    for (property, value) in pairs {
        block.set(property, value);
    }
    if block.is_empty() {
        tree.remove_attribute(node, "style")?;
    } else {
        tree.set_attribute(node, "style", &block.to_string())?;
    }
    Ok(())
}

impl Selection {
    fn for_each_write(&self, mut f: impl FnMut(&mut DomTree, NodeId) -> Result<()>) -> Result<&Self> {
        self.dom().write(|doc| -> Result<()> {
            let tree = doc.tree_mut();
            for el in self.iter() {
                f(tree, el)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Assign `value(el, i, all)` to every element, one at a time
    ///
    /// Each callback runs with the document released, after the previous
    /// element's value has been stored.
    fn assign_with(
        &self,
        mut value: impl FnMut(NodeId, usize, &[NodeId]) -> String,
        mut store: impl FnMut(&mut DomTree, NodeId, &str) -> Result<()>,
    ) -> Result<&Self> {
        for (i, el) in self.iter().enumerate() {
            let v = value(el, i, self.elements());
            self.dom().write(|doc| store(doc.tree_mut(), el, &v))?;
        }
        Ok(self)
    }

    // --- attributes ---

    /// Attribute value per element; `None` where absent
    pub fn attr(&self, name: &str) -> Vec<Option<String>> {
        self.dom().read(|doc| {
            let tree = doc.tree();
            self.iter()
                .map(|el| tree.get_attribute(el, name).map(str::to_string))
                .collect()
        })
    }

    pub fn set_attr(&self, name: &str, value: &str) -> Result<&Self> {
        tracing::trace!(name, value, count = self.len(), "set attribute");
        self.for_each_write(|tree, el| Ok(tree.set_attribute(el, name, value)?))
    }

    /// Apply every pair, in order, to every element
    pub fn set_attrs<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<&Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in pairs {
            self.set_attr(name.as_ref(), value.as_ref())?;
        }
        Ok(self)
    }

    pub fn attr_access(&self, access: Access) -> Result<Accessed<'_, Option<String>>> {
        Ok(match access {
            Access::Get(name) => Accessed::Values(self.attr(&name)),
            Access::Set(name, value) => Accessed::Selection(self.set_attr(&name, &value)?),
            Access::SetMany(pairs) => Accessed::Selection(self.set_attrs(pairs)?),
        })
    }

    // --- data attributes ---

    /// `data-{name}` attribute per element
    pub fn data(&self, name: &str) -> Vec<Option<String>> {
        self.attr(&data_name(name))
    }

    pub fn set_data(&self, name: &str, value: &str) -> Result<&Self> {
        self.set_attr(&data_name(name), value)
    }

    pub fn set_data_many<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<&Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.set_attrs(
            pairs
                .into_iter()
                .map(|(k, v)| (data_name(k.as_ref()), v)),
        )
    }

    pub fn data_access(&self, access: Access) -> Result<Accessed<'_, Option<String>>> {
        let access = match access {
            Access::Get(name) => Access::Get(data_name(&name)),
            Access::Set(name, value) => Access::Set(data_name(&name), value),
            Access::SetMany(pairs) => Access::SetMany(
                pairs
                    .into_iter()
                    .map(|(k, v)| (data_name(&k), v))
                    .collect(),
            ),
        };
        self.attr_access(access)
    }

    // --- style ---

    /// Computed value of a style property per element
    ///
    /// Accepts `camelCase` or `kebab-case` names.
    pub fn style(&self, name: &str) -> Vec<String> {
        self.dom().read(|doc| {
            let tree = doc.tree();
            let resolver = StyleResolver::from_tree(tree);
            self.iter()
                .map(|el| resolver.computed_value(tree, el, name))
                .collect()
        })
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style(&self, name: &str, value: &str) -> Result<&Self> {
        tracing::trace!(name, value, count = self.len(), "set style");
        self.for_each_write(|tree, el| write_inline_style(tree, el, &[(name, value)]))
    }

    pub fn set_styles<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<&Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let borrowed: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();
        self.for_each_write(|tree, el| write_inline_style(tree, el, &borrowed))
    }

    pub fn style_access(&self, access: Access) -> Result<Accessed<'_, String>> {
        Ok(match access {
            Access::Get(name) => Accessed::Values(self.style(&name)),
            Access::Set(name, value) => Accessed::Selection(self.set_style(&name, &value)?),
            Access::SetMany(pairs) => Accessed::Selection(self.set_styles(pairs)?),
        })
    }

    // --- text ---

    /// Text content per element
    pub fn text(&self) -> Vec<String> {
        self.dom()
            .read(|doc| self.iter().map(|el| doc.tree().text_content(el)).collect())
    }

    pub fn set_text(&self, value: &str) -> Result<&Self> {
        self.for_each_write(|tree, el| Ok(tree.set_text_content(el, value)?))
    }

    pub fn set_text_with(
        &self,
        value: impl FnMut(NodeId, usize, &[NodeId]) -> String,
    ) -> Result<&Self> {
        self.assign_with(value, |tree, el, v| Ok(tree.set_text_content(el, v)?))
    }

    // --- markup ---

    /// Serialized children per element
    pub fn html(&self) -> Vec<String> {
        self.dom().read(|doc| {
            self.iter()
                .map(|el| domops_html::inner_html(doc.tree(), el))
                .collect()
        })
    }

    /// Replace the children of every element with parsed `markup`
    pub fn set_html(&self, markup: &str) -> Result<&Self> {
        self.for_each_write(|tree, el| replace_children_with_markup(tree, el, markup))
    }

    pub fn set_html_with(
        &self,
        markup: impl FnMut(NodeId, usize, &[NodeId]) -> String,
    ) -> Result<&Self> {
        self.assign_with(markup, replace_children_with_markup)
    }

    // --- form values ---

    /// Form value per element; `None` for elements that are not controls
    pub fn value(&self) -> Vec<Option<String>> {
        self.dom()
            .read(|doc| self.iter().map(|el| doc.tree().form_value(el)).collect())
    }

    pub fn set_value(&self, value: &str) -> Result<&Self> {
        self.for_each_write(|tree, el| Ok(tree.set_form_value(el, value)?))
    }

    pub fn set_value_with(
        &self,
        value: impl FnMut(NodeId, usize, &[NodeId]) -> String,
    ) -> Result<&Self> {
        self.assign_with(value, |tree, el, v| Ok(tree.set_form_value(el, v)?))
    }
}

fn replace_children_with_markup(tree: &mut DomTree, node: NodeId, markup: &str) -> Result<()> {
    let nodes = domops_html::parse_fragment(tree, markup)?;
    tree.remove_all_children(node)?;
    for child in nodes {
        tree.append_child(node, child)?;
    }
    tracing::trace!(%node, "replaced markup");
    Ok(())
}
