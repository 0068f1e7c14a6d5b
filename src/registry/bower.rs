//! Bower registry adapter
//!
//! Resolves a dependency source to a git remote and lists its versions from
//! the remote's tags.
//! Registry API endpoint: {registry}/packages/{name}

use crate::domain::LatestInfo;
use crate::error::RegistryError;
use crate::registry::{HttpClient, LogBus, LogLevel, RegistryInfo, RegistryService};
use crate::update::is_prerelease;
use async_trait::async_trait;
use node_semver::Version;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::debug;

/// `owner/repo` GitHub shorthand
static SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w.-]+)/([\w.-]+?)(?:\.git)?$").unwrap());

/// A line of `git ls-remote --tags --refs` output
static TAG_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]+\s+refs/tags/(\S+)$").unwrap());

/// Where a dependency source points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A git remote usable as-is
    Remote(String),
    /// A name registered in the bower registry
    Registered(String),
}

/// Classify a dependency source
pub fn resolve_source(source: &str) -> SourceKind {
    let source = source.trim();

    if source.contains("://") || source.starts_with("git@") || source.starts_with(['.', '/', '~'])
    {
        return SourceKind::Remote(source.to_string());
    }

    if let Some(caps) = SHORTHAND_RE.captures(source) {
        return SourceKind::Remote(format!("https://github.com/{}/{}.git", &caps[1], &caps[2]));
    }

    SourceKind::Registered(source.to_string())
}

/// Versions extracted from tag listing output
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tags {
    /// Valid versions, highest first, without duplicates
    pub versions: Vec<String>,
    /// Tags that are not versions
    pub ignored: Vec<String>,
}

/// Extract versions from `git ls-remote --tags --refs` output
pub fn parse_tags(output: &str) -> Tags {
    let mut parsed: Vec<Version> = Vec::new();
    let mut ignored = Vec::new();

    for line in output.lines() {
        let Some(caps) = TAG_LINE_RE.captures(line.trim()) else {
            continue;
        };
        let tag = &caps[1];
        let bare = tag
            .strip_prefix('v')
            .or_else(|| tag.strip_prefix('='))
            .unwrap_or(tag);

        match Version::parse(bare) {
            Ok(version) => parsed.push(version),
            Err(_) => ignored.push(tag.to_string()),
        }
    }

    parsed.sort_by(|a, b| b.cmp(a));
    parsed.dedup();

    Tags {
        versions: parsed.iter().map(|v| v.to_string()).collect(),
        ignored,
    }
}

/// Highest stable version, else the highest prerelease
pub fn latest_of(versions: &[String]) -> Option<String> {
    let mut parsed: Vec<Version> = versions
        .iter()
        .filter_map(|v| Version::parse(v).ok())
        .collect();
    parsed.sort_by(|a, b| b.cmp(a));

    parsed
        .iter()
        .find(|v| !is_prerelease(v))
        .or_else(|| parsed.first())
        .map(|v| v.to_string())
}

/// Registry lookup response
#[derive(Debug, Deserialize)]
struct PackageLookup {
    url: String,
}

/// Bower registry adapter
pub struct BowerRegistry {
    client: HttpClient,
    registry_url: String,
}

impl BowerRegistry {
    /// Create an adapter for the given registry endpoint
    pub fn new(registry_url: impl Into<String>) -> Result<Self, RegistryError> {
        Ok(Self::with_client(HttpClient::new()?, registry_url))
    }

    /// Create an adapter with a custom HTTP client
    pub fn with_client(client: HttpClient, registry_url: impl Into<String>) -> Self {
        Self {
            client,
            registry_url: registry_url.into(),
        }
    }

    fn build_url(&self, name: &str) -> String {
        format!("{}/packages/{}", self.registry_url.trim_end_matches('/'), name)
    }

    async fn lookup(&self, name: &str, bus: &LogBus) -> Result<String, RegistryError> {
        bus.log(
            LogLevel::Info,
            "lookup",
            name,
            format!("Looking up {} at {}", name, self.registry_url),
        );

        let url = self.build_url(name);
        let entry: PackageLookup = self
            .client
            .get_json(&url, name, self.registry_name())
            .await?;
        Ok(entry.url)
    }

    async fn ls_remote(&self, remote: &str) -> Result<String, RegistryError> {
        debug!(remote, "running git ls-remote");

        let output = Command::new("git")
            .args(["ls-remote", "--tags", "--refs", remote])
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .map_err(|e| RegistryError::git_error(remote, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("git exited with {}", output.status),
                text => text.to_string(),
            };
            return Err(RegistryError::git_error(remote, message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl RegistryService for BowerRegistry {
    fn registry_name(&self) -> &'static str {
        "bower"
    }

    async fn info(&self, source: &str, bus: &LogBus) -> Result<RegistryInfo, RegistryError> {
        bus.log(LogLevel::Info, "resolve", source, format!("Resolving {}", source));

        let remote = match resolve_source(source) {
            SourceKind::Remote(remote) => remote,
            SourceKind::Registered(name) => self.lookup(&name, bus).await?,
        };

        bus.log(
            LogLevel::Action,
            "ls-remote",
            source,
            format!("Listing tags of {}", remote),
        );
        let output = self.ls_remote(&remote).await?;
        let tags = parse_tags(&output);

        for tag in &tags.ignored {
            bus.log(
                LogLevel::Debug,
                "tag",
                source,
                format!("Ignoring tag {}, not a valid version", tag),
            );
        }
        if tags.versions.is_empty() {
            bus.log(
                LogLevel::Warn,
                "no-versions",
                source,
                format!("No versions found for {}", remote),
            );
        }

        let latest = latest_of(&tags.versions)
            .map(|version| LatestInfo::new(version).with_metadata("url", remote));

        Ok(RegistryInfo {
            versions: tags.versions,
            latest,
        })
    }
}
