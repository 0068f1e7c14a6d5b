//! Package descriptors carried through the update pipeline

use super::{detect_range_char, parse_range, Endpoint};
use node_semver::Range;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Manifest section a package is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `dependencies`
    Dependencies,
    /// `devDependencies`
    DevDependencies,
}

impl Section {
    /// Key of this section in bower.json
    pub fn key(&self) -> &'static str {
        match self {
            Section::Dependencies => "dependencies",
            Section::DevDependencies => "devDependencies",
        }
    }

    /// Section for the given dev flag
    pub fn from_dev(dev: bool) -> Self {
        if dev {
            Section::DevDependencies
        } else {
            Section::Dependencies
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Latest release descriptor reported by the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestInfo {
    /// Latest version, absent when the registry knows no release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Any other metadata the registry attached
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl LatestInfo {
    /// Creates a descriptor for the given version
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            metadata: Map::new(),
        }
    }

    /// Adds a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A declared dependency under consideration for an update
#[derive(Debug, Clone)]
pub struct Package {
    /// Key within its manifest section
    pub name: String,
    /// Registry locator
    pub source: String,
    /// Raw declared target
    pub target: String,
    /// Range parsed from `target`, `None` when the target is not a valid range
    pub range: Option<Range>,
    /// Decorating prefix of `target` (`^`, `~`, ...), empty when undecorated
    pub range_char: String,
    /// Declared under devDependencies
    pub dev: bool,
    /// Published versions
    pub versions: Vec<String>,
    /// Latest release descriptor
    pub latest: LatestInfo,
    /// Lowest published version satisfying `range`
    pub min: Option<String>,
    /// Highest published version satisfying `range`
    pub max: Option<String>,
    /// Chosen replacement target
    pub value: Option<String>,
}

impl Package {
    /// Creates a package from a decomposed endpoint
    pub fn new(endpoint: Endpoint, dev: bool) -> Self {
        let range = parse_range(&endpoint.target);
        let range_char = detect_range_char(&endpoint.target, range.as_ref());

        Self {
            name: endpoint.name,
            source: endpoint.source,
            target: endpoint.target,
            range,
            range_char,
            dev,
            versions: Vec::new(),
            latest: LatestInfo::default(),
            min: None,
            max: None,
            value: None,
        }
    }

    /// Creates a package from a manifest entry
    pub fn from_entry(name: &str, value: &str, dev: bool) -> Self {
        Self::new(Endpoint::decompose(name, value), dev)
    }

    /// Section this package is written back to
    pub fn section(&self) -> Section {
        Section::from_dev(self.dev)
    }

    /// Key unique across both dependency sections
    pub fn key(&self) -> String {
        format!("{}:{}", self.section(), self.name)
    }

    /// Latest published version, if any
    pub fn latest_version(&self) -> Option<&str> {
        self.latest.version.as_deref()
    }

    /// Returns true when the latest release is not the lowest satisfying version.
    ///
    /// A target that is not a valid range is never updated.
    pub fn needs_update(&self) -> bool {
        if self.range.is_none() {
            return false;
        }
        match self.latest_version() {
            Some(latest) => self.min.as_deref() != Some(latest),
            None => false,
        }
    }

    /// Target to write back: the chosen value, else the original target.
    ///
    /// An empty value counts as no choice.
    pub fn resolved_target(&self) -> &str {
        self.value
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.target)
    }

    /// Returns true when the resolved target differs from the declared one
    pub fn is_changed(&self) -> bool {
        self.resolved_target() != self.target
    }

    /// Endpoint carrying the resolved target
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.name, &self.source, self.resolved_target())
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = if self.dev { " (dev)" } else { "" };
        write!(f, "{}#{}{}", self.name, self.target, dev_marker)
    }
}
