//! Package set loading
//!
//! Expands the manifest's dependency sections into packages and narrows them
//! down to the ones the run should look at.

use crate::console::Console;
use crate::domain::{Package, Section};
use crate::error::AppError;
use crate::manifest::Manifest;
use crate::options::{FilterFn, UpdateOptions};
use crate::prompt::{CheckboxGroup, CheckboxItem, CheckboxQuestion, Prompter};
use std::collections::HashSet;

/// How packages are included, in order of precedence
pub enum InclusionPolicy {
    /// Programmatic predicate
    Filter(FilterFn),
    /// Every package
    PickAll,
    /// Operator multi-select
    Interactive,
}

impl InclusionPolicy {
    /// Pick the policy implied by the options
    pub fn from_options(options: &UpdateOptions) -> Self {
        if let Some(filter) = &options.filter {
            InclusionPolicy::Filter(filter.clone())
        } else if options.pick_all {
            InclusionPolicy::PickAll
        } else {
            InclusionPolicy::Interactive
        }
    }
}

/// Packages declared in one manifest section, in document order
pub fn collect_packages(manifest: &Manifest, section: Section) -> Result<Vec<Package>, AppError> {
    let dev = section == Section::DevDependencies;
    Ok(manifest
        .entries(section)?
        .into_iter()
        .map(|(name, value)| Package::from_entry(&name, &value, dev))
        .collect())
}

fn group(title: &str, packages: &[Package]) -> Option<CheckboxGroup> {
    if packages.is_empty() {
        return None;
    }

    Some(CheckboxGroup {
        title: title.to_string(),
        items: packages
            .iter()
            .map(|package| CheckboxItem {
                name: package.name.clone(),
                detail: package.target.clone(),
                checked: true,
            })
            .collect(),
    })
}

/// Multi-select question over both sections, every item pre-checked
pub fn build_checkbox(dependencies: &[Package], dev_dependencies: &[Package]) -> CheckboxQuestion {
    let total = dependencies.len() + dev_dependencies.len();

    CheckboxQuestion {
        message: format!("Which packages would you like to check? ({} in total)", total),
        groups: [
            group("dependencies:", dependencies),
            group("devDependencies:", dev_dependencies),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}

/// Build the package set of a run.
///
/// devDependencies are only read when enabled in the options.
pub fn prepare_packages(
    manifest: &Manifest,
    options: &UpdateOptions,
    prompter: &mut dyn Prompter,
    console: &Console,
) -> Result<Vec<Package>, AppError> {
    let dependencies = collect_packages(manifest, Section::Dependencies)?;
    let dev_dependencies = if options.dev_dependencies {
        collect_packages(manifest, Section::DevDependencies)?
    } else {
        Vec::new()
    };

    match InclusionPolicy::from_options(options) {
        InclusionPolicy::Filter(filter) => {
            console.verbose_writeln("Selecting packages by provided `filter` function...");
            Ok(dependencies
                .into_iter()
                .chain(dev_dependencies)
                .filter(|package| filter(package, options))
                .collect())
        }
        InclusionPolicy::PickAll => {
            console.verbose_writeln("All packages are picked to update version.");
            Ok(dependencies.into_iter().chain(dev_dependencies).collect())
        }
        InclusionPolicy::Interactive => {
            let question = build_checkbox(&dependencies, &dev_dependencies);
            if question.item_count() == 0 {
                return Ok(Vec::new());
            }

            let chosen: HashSet<usize> = prompter.checkbox(&question)?.into_iter().collect();
            Ok(dependencies
                .into_iter()
                .chain(dev_dependencies)
                .enumerate()
                .filter(|(index, _)| chosen.contains(index))
                .map(|(_, package)| package)
                .collect())
        }
    }
}
