//! CLI argument parsing module for bower-update

use crate::manifest::BowerrcSettings;
use crate::options::{LogCriteria, UpdateOptions};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Update bower.json dependency versions
#[derive(Parser, Debug, Clone)]
#[command(name = "bower-update", version, about = "Update bower.json dependency versions")]
pub struct CliArgs {
    /// Directory holding bower.json (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Skip all prompting and set every outdated package to its latest version
    #[arg(long)]
    pub force_latest: bool,

    /// Check every package without asking which ones
    #[arg(long)]
    pub pick_all: bool,

    /// Prefix forced on every generated target (e.g. ^, ~, >=)
    #[arg(long, value_name = "CHAR")]
    pub range_char: Option<String>,

    /// Where registry messages go: true, false, a level name or a number
    #[arg(long, value_name = "CRITERIA")]
    pub log_bower_info: Option<String>,

    /// Leave devDependencies alone
    #[arg(long)]
    pub no_dev: bool,

    /// Keep resolutions of updated packages
    #[arg(long)]
    pub keep_resolutions: bool,

    /// Check only these packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append, value_name = "NAME")]
    pub only: Vec<String>,

    /// Skip these packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Bower registry endpoint
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Check if a package should be processed based on filters
    pub fn should_process_package(&self, name: &str) -> bool {
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        !self.exclude.iter().any(|p| p == name)
    }

    /// Whether `--only` or `--exclude` was given
    pub fn has_package_filter(&self) -> bool {
        !self.only.is_empty() || !self.exclude.is_empty()
    }

    /// Layer the flags over defaults and the given `.bowerrc` settings
    pub fn into_options(self, settings: &BowerrcSettings) -> UpdateOptions {
        let mut options = settings.apply_to(UpdateOptions::new().with_cwd(self.path.clone()));

        options.dev_dependencies = !self.no_dev;
        options.clear_resolutions = !self.keep_resolutions;
        options.pick_all = self.pick_all;
        options.force_latest = self.force_latest;

        if let Some(range_char) = &self.range_char {
            options.range_char = range_char.clone();
        }
        if let Some(criteria) = &self.log_bower_info {
            options.log_bower_info = LogCriteria::parse(criteria);
        }
        if let Some(registry) = &self.registry {
            options.registry_url = registry.clone();
        }

        if self.has_package_filter() {
            options =
                options.with_filter(move |package, _| self.should_process_package(&package.name));
        }

        options
    }
}
