//! Endpoint decomposition for bower.json entries
//!
//! A manifest entry maps a name to a value that may carry a source locator
//! alongside the version target:
//! - `"jquery": "~2.1.0"` - registered name, target `~2.1.0`
//! - `"lib": "owner/repo#^1.0.0"` - GitHub shorthand with a target
//! - `"lib": "https://example.com/lib.git"` - source only, target `*`

use std::fmt;

/// A dependency split into name, source locator and version target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Key of the entry in the manifest section
    pub name: String,
    /// Registry name, shorthand, URL or path
    pub source: String,
    /// Version target, `*` when absent
    pub target: String,
}

/// Returns true for targets that accept any version
pub fn is_wildcard(target: &str) -> bool {
    matches!(target, "" | "*" | "latest")
}

fn looks_like_source(value: &str) -> bool {
    value.contains('/') || value.contains('@')
}

impl Endpoint {
    /// Creates an endpoint from its parts
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Splits a manifest entry into its endpoint parts
    pub fn decompose(name: &str, value: &str) -> Self {
        let name = name.trim();
        let value = value.trim();

        let (source, target) = match value.split_once('#') {
            Some((source, rest)) => {
                let source = source.trim();
                let target = rest.split('#').next().unwrap_or_default().trim();
                (if source.is_empty() { name } else { source }, target)
            }
            None if looks_like_source(value) => (value, "*"),
            None => (name, value),
        };

        let target = if is_wildcard(target) { "*" } else { target };
        Self::new(name, source, target)
    }

    /// Joins source and target back into a manifest value
    pub fn compose(&self) -> String {
        let target = self.target.trim();
        let mut value = String::new();

        if self.source != self.name {
            value.push_str(self.source.trim());
        }

        if value.is_empty() {
            value.push_str(if target.is_empty() { "*" } else { target });
        } else if !is_wildcard(target) {
            value.push('#');
            value.push_str(target);
        }

        value
    }

    /// Returns a copy of this endpoint with a different target
    pub fn with_target(&self, target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}#{}", self.name, self.source, self.target)
    }
}
