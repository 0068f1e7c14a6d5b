//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Workflow coordination: locate → read → prepare → fetch → choose → write
//! - Registry log routing for the duration of the fetch
//! - A single manifest write at the very end, so any failure leaves it untouched

use crate::console::Console;
use crate::domain::Package;
use crate::error::{AppError, ManifestError, RegistryError};
use crate::loader::prepare_packages;
use crate::manifest::{apply_packages, render, FsManifestStore, Manifest, ManifestStore};
use crate::options::UpdateOptions;
use crate::progress::Progress;
use crate::prompt::Prompter;
use crate::registry::{fetch_all, BowerRegistry, LogBus, RegistryService};
use crate::update::choose_versions;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::debug;

/// Run blocking prompt work without stalling other tasks on a worker thread.
///
/// `block_in_place` panics on a current-thread runtime, where the work simply
/// runs inline.
fn off_runtime<T>(work: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    options: UpdateOptions,
    store: Box<dyn ManifestStore>,
    registry: Box<dyn RegistryService>,
    console: Arc<Console>,
    show_progress: bool,
}

/// Outcome of a successful run
#[derive(Debug)]
pub struct RunReport {
    /// Manifest that was rewritten
    pub manifest_path: PathBuf,
    /// Manifest content as written
    pub manifest: Manifest,
    /// Packages of the run with their chosen targets
    pub packages: Vec<Package>,
    /// Number of packages whose target changed
    pub updated: usize,
}

impl Orchestrator {
    /// Create an orchestrator with the filesystem store and the bower registry
    pub fn new(options: UpdateOptions, console: Arc<Console>) -> Result<Self, RegistryError> {
        let registry = BowerRegistry::new(options.registry_url.clone())?;
        Ok(Self::with_services(
            options,
            Box::new(FsManifestStore),
            Box::new(registry),
            console,
        ))
    }

    /// Create an orchestrator with custom collaborators
    pub fn with_services(
        options: UpdateOptions,
        store: Box<dyn ManifestStore>,
        registry: Box<dyn RegistryService>,
        console: Arc<Console>,
    ) -> Self {
        Self {
            options,
            store,
            registry,
            console,
            show_progress: false,
        }
    }

    /// Show a spinner while registry lookups run
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the update workflow
    pub async fn run(&self, prompter: &mut dyn Prompter) -> Result<RunReport, AppError> {
        let path = self.store.locate(&self.options.cwd)?;
        self.console
            .verbose_writeln(&format!("Parsing {}...", path.display().to_string().blue()));
        let mut manifest = self.store.read(&path)?;

        let packages = off_runtime(|| {
            prepare_packages(&manifest, &self.options, &mut *prompter, &self.console)
        })?;
        let packages = self.fetch(packages).await?;
        let packages = off_runtime(|| {
            choose_versions(&self.options, packages, &mut *prompter, &self.console)
        })?;

        let updated = apply_packages(&mut manifest, &packages, self.options.clear_resolutions)?;
        let content = render(&manifest).map_err(|e| ManifestError::write_error(&path, e.into()))?;
        self.store.write(&path, &content)?;
        debug!(path = %path.display(), updated, "manifest written");

        self.console.ok(&format!(
            "Successfully updated versions of {} bower dependencies.",
            updated
        ));

        Ok(RunReport {
            manifest_path: path,
            manifest,
            packages,
            updated,
        })
    }

    /// Look up every package while registry events are routed to the console
    async fn fetch(&self, packages: Vec<Package>) -> Result<Vec<Package>, RegistryError> {
        let bus = LogBus::new();
        let console = Arc::clone(&self.console);
        let criteria = self.options.log_bower_info.clone();
        let _subscription = bus.subscribe(move |event| console.registry_event(event, &criteria));

        self.console.writeln("Loading dependencies information...");
        debug!(
            registry = self.registry.registry_name(),
            count = packages.len(),
            "fetching package info"
        );

        let mut progress = Progress::new(self.show_progress);
        progress.spinner(&format!("Fetching {} packages", packages.len()));
        let result = fetch_all(self.registry.as_ref(), packages, &bus).await;
        progress.finish_and_clear();

        let packages = result?;
        for package in &packages {
            self.console.verbose_writeln(&format!(
                "Got info on {} package - latest version is {}",
                package.name.blue(),
                package.latest_version().unwrap_or("undefined")
            ));
        }

        Ok(packages)
    }
}
