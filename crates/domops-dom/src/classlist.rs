//! Class list
//!
//! Space-separated token handling for the `class` attribute. The attribute
//! string stays authoritative; a [`ClassList`] is parsed from it, edited and
//! written back.

/// Token list for the `class` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string, dropping duplicates
    pub fn parse(s: &str) -> Self {
        let mut list = Self::new();
        list.add(&s.split_whitespace().collect::<Vec<_>>());
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add token(s)
    pub fn add(&mut self, tokens: &[&str]) {
        for token in tokens {
            if !token.is_empty() && !self.contains(token) {
                self.tokens.push(token.to_string());
            }
        }
    }

    /// Remove token(s)
    pub fn remove(&mut self, tokens: &[&str]) {
        self.tokens.retain(|t| !tokens.contains(&t.as_str()));
    }

    /// Serialized attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let list = ClassList::parse("btn  btn-primary active btn");
        assert_eq!(list.len(), 3);
        assert!(list.contains("btn"));
        assert!(list.contains("btn-primary"));
        assert_eq!(list.value(), "btn btn-primary active");
    }

    #[test]
    fn test_add_remove() {
        let mut list = ClassList::new();
        list.add(&["foo", "bar", ""]);
        assert_eq!(list.len(), 2);

        list.remove(&["foo", "missing"]);
        assert_eq!(list.len(), 1);
        assert!(!list.contains("foo"));
    }
}
