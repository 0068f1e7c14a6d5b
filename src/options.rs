//! Update options
//!
//! This module provides the UpdateOptions struct that encapsulates
//! everything that steers a run: which packages are considered, how
//! targets are chosen and where registry log events are routed.

use crate::domain::Package;
use crate::registry::{LogEvent, LogLevel};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default bower registry endpoint
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.bower.io";

/// Programmatic package inclusion
pub type FilterFn = Arc<dyn Fn(&Package, &UpdateOptions) -> bool + Send + Sync>;

/// Programmatic target selection; `None` keeps the current target
pub type ChooseFn = Arc<dyn Fn(&Package, &UpdateOptions) -> Option<String> + Send + Sync>;

/// Predicate deciding whether a registry event goes to the normal channel
pub type EventPredicate = Arc<dyn Fn(&LogEvent) -> bool + Send + Sync>;

/// Rule routing registry log events to the normal or verbose channel
#[derive(Clone)]
pub enum LogCriteria {
    /// `true` sends everything to the normal channel, `false` to verbose
    Flag(bool),
    /// Events at or above this level go to the normal channel
    Threshold(u8),
    /// Custom decision per event
    Predicate(EventPredicate),
}

impl LogCriteria {
    /// Parses a criteria value: `true`/`false`, a level name or a number.
    ///
    /// Anything else means threshold 0, so every event is shown.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value {
            "true" => return LogCriteria::Flag(true),
            "false" => return LogCriteria::Flag(false),
            _ => {}
        }

        if let Ok(level) = value.parse::<LogLevel>() {
            return LogCriteria::Threshold(level.value());
        }

        LogCriteria::Threshold(value.parse().unwrap_or(0))
    }

    /// Returns true when the event belongs on the normal channel
    pub fn is_normal(&self, event: &LogEvent) -> bool {
        match self {
            LogCriteria::Flag(flag) => *flag,
            LogCriteria::Threshold(threshold) => *threshold <= event.level.value(),
            LogCriteria::Predicate(predicate) => predicate(event),
        }
    }
}

impl Default for LogCriteria {
    fn default() -> Self {
        LogCriteria::Threshold(LogLevel::Warn.value())
    }
}

impl fmt::Debug for LogCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogCriteria::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            LogCriteria::Threshold(level) => f.debug_tuple("Threshold").field(level).finish(),
            LogCriteria::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Options for a single update run
#[derive(Clone)]
pub struct UpdateOptions {
    /// Directory the manifest is located in
    pub cwd: PathBuf,
    /// Include the devDependencies section
    pub dev_dependencies: bool,
    /// Delete resolutions of every touched package
    pub clear_resolutions: bool,
    /// Skip the package multi-select and take everything
    pub pick_all: bool,
    /// Skip all prompting and take the latest version
    pub force_latest: bool,
    /// Prefix forced on every generated target, overriding detected prefixes
    pub range_char: String,
    /// Routing of registry log events
    pub log_bower_info: LogCriteria,
    /// Programmatic package inclusion
    pub filter: Option<FilterFn>,
    /// Programmatic target selection
    pub choose: Option<ChooseFn>,
    /// Bower registry endpoint
    pub registry_url: String,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            dev_dependencies: true,
            clear_resolutions: true,
            pick_all: false,
            force_latest: false,
            range_char: String::new(),
            log_bower_info: LogCriteria::default(),
            filter: None,
            choose: None,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
        }
    }
}

impl UpdateOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Set whether devDependencies are considered
    pub fn with_dev_dependencies(mut self, include: bool) -> Self {
        self.dev_dependencies = include;
        self
    }

    /// Set whether resolutions are cleared
    pub fn with_clear_resolutions(mut self, clear: bool) -> Self {
        self.clear_resolutions = clear;
        self
    }

    /// Set whether every package is picked without asking
    pub fn with_pick_all(mut self, pick_all: bool) -> Self {
        self.pick_all = pick_all;
        self
    }

    /// Set whether the latest version is forced
    pub fn with_force_latest(mut self, force_latest: bool) -> Self {
        self.force_latest = force_latest;
        self
    }

    /// Set the forced prefix character
    pub fn with_range_char(mut self, range_char: impl Into<String>) -> Self {
        self.range_char = range_char.into();
        self
    }

    /// Set the registry log routing
    pub fn with_log_bower_info(mut self, criteria: LogCriteria) -> Self {
        self.log_bower_info = criteria;
        self
    }

    /// Set the package inclusion predicate
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Package, &UpdateOptions) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Set the target chooser
    pub fn with_choose<F>(mut self, choose: F) -> Self
    where
        F: Fn(&Package, &UpdateOptions) -> Option<String> + Send + Sync + 'static,
    {
        self.choose = Some(Arc::new(choose));
        self
    }

    /// Set the registry endpoint
    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into();
        self
    }

    /// Prefix used for a package: the forced one, else the package's own
    pub fn range_char_for<'a>(&'a self, package: &'a Package) -> &'a str {
        if self.range_char.is_empty() {
            &package.range_char
        } else {
            &self.range_char
        }
    }
}

impl fmt::Debug for UpdateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateOptions")
            .field("cwd", &self.cwd)
            .field("dev_dependencies", &self.dev_dependencies)
            .field("clear_resolutions", &self.clear_resolutions)
            .field("pick_all", &self.pick_all)
            .field("force_latest", &self.force_latest)
            .field("range_char", &self.range_char)
            .field("log_bower_info", &self.log_bower_info)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .field("choose", &self.choose.as_ref().map(|_| ".."))
            .field("registry_url", &self.registry_url)
            .finish()
    }
}
