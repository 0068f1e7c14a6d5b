//! Registry access for dependency version information
//!
//! This module provides:
//! - The RegistryService seam and the data it returns
//! - Concurrent, all-or-nothing lookup of a package batch
//! - Log events pushed by registries while they work
//! - The bower registry adapter and its HTTP client

mod bower;
mod client;
mod events;

pub use bower::{latest_of, parse_tags, resolve_source, BowerRegistry, SourceKind, Tags};
pub use client::HttpClient;
pub use events::{LogBus, LogEvent, LogLevel, Subscription, UnknownLevel};

use crate::domain::{LatestInfo, Package};
use crate::error::RegistryError;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;

/// Maximum number of lookups in flight
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Published versions and latest release of a source
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryInfo {
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub latest: Option<LatestInfo>,
}

/// Trait for registry services
#[async_trait]
pub trait RegistryService: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Look up a source, pushing log events on `bus` while working
    async fn info(&self, source: &str, bus: &LogBus) -> Result<RegistryInfo, RegistryError>;
}

/// Fetch registry info for every package.
///
/// Results keep the input order. The first failure aborts the batch and is
/// reported with the name of the package whose lookup failed.
pub async fn fetch_all(
    registry: &dyn RegistryService,
    packages: Vec<Package>,
    bus: &LogBus,
) -> Result<Vec<Package>, RegistryError> {
    stream::iter(packages)
        .map(|mut package| async move {
            let info = registry
                .info(&package.source, bus)
                .await
                .map_err(|e| RegistryError::lookup_failed(&package.name, e))?;

            package.versions = info.versions;
            package.latest = info.latest.unwrap_or_default();
            Ok::<_, RegistryError>(package)
        })
        .buffered(DEFAULT_CONCURRENCY)
        .try_collect()
        .await
}
