//! Update selection for fetched packages
//!
//! This module provides:
//! - Version arithmetic over published versions
//! - Replacement target candidates
//! - The selector deciding a new target for every update candidate

mod candidates;
mod versions;

pub use candidates::{version_choices, Candidate, CandidateKind};
pub use versions::{is_prerelease, max_satisfying, min_satisfying};

use crate::console::Console;
use crate::domain::Package;
use crate::error::PromptError;
use crate::options::{ChooseFn, UpdateOptions};
use crate::prompt::{ListChoice, ListQuestion, Prompter};
use colored::Colorize;

/// How new targets are decided, in order of precedence
pub enum SelectionPolicy {
    /// Programmatic chooser
    Choose(ChooseFn),
    /// Latest version with the package's prefix
    ForceLatest,
    /// One question per candidate
    Interactive,
}

impl SelectionPolicy {
    /// Pick the policy implied by the options
    pub fn from_options(options: &UpdateOptions) -> Self {
        if let Some(choose) = &options.choose {
            SelectionPolicy::Choose(choose.clone())
        } else if options.force_latest {
            SelectionPolicy::ForceLatest
        } else {
            SelectionPolicy::Interactive
        }
    }
}

/// Fill `min` and `max` from the package's versions and range
pub fn mark_bounds(package: &mut Package) {
    package.min = min_satisfying(&package.versions, package.range.as_ref());
    package.max = max_satisfying(&package.versions, package.range.as_ref());
}

/// Latest version decorated with the effective prefix
pub fn latest_target(package: &Package, options: &UpdateOptions) -> Option<String> {
    package
        .latest_version()
        .map(|latest| format!("{}{}", options.range_char_for(package), latest))
}

fn push_candidates(choices: &mut Vec<ListChoice>, version: &str, range_char: &str) {
    choices.extend(
        version_choices(version, range_char)
            .into_iter()
            .map(|candidate| ListChoice::value(candidate.value, candidate.kind.description())),
    );
}

/// Build the target question for an update candidate
pub fn build_question(package: &Package, options: &UpdateOptions) -> ListQuestion {
    let latest = package.latest_version().unwrap_or_default();
    let max = package.max.as_deref();

    let mut choices = vec![ListChoice::value(package.target.clone(), Some("keep current"))];

    match max {
        Some(max) if package.min.as_deref() != Some(max) => {
            choices.push(ListChoice::Separator(format!("Max satisfying version is {}", max)));
            push_candidates(&mut choices, max, &options.range_char);
        }
        _ => choices.push(ListChoice::Separator(
            "Max satisfying version is the same.".to_string(),
        )),
    }

    if max != Some(latest) {
        choices.push(ListChoice::Separator(format!("Latest version is {}", latest)));
        push_candidates(&mut choices, latest, &options.range_char);
    }

    ListQuestion {
        name: package.key(),
        message: format!("Which target to be set for {}?", package.name),
        choices,
        default: latest_target(package, options).unwrap_or_default(),
    }
}

/// Decide new targets.
///
/// Every package gets its bounds marked. Only packages whose latest version
/// differs from the lowest satisfying one are candidates; the rest keep
/// `value = None`. All packages are returned in input order.
pub fn choose_versions(
    options: &UpdateOptions,
    mut packages: Vec<Package>,
    prompter: &mut dyn Prompter,
    console: &Console,
) -> Result<Vec<Package>, PromptError> {
    packages.iter_mut().for_each(mark_bounds);

    let candidates: Vec<usize> = packages
        .iter()
        .enumerate()
        .filter(|(_, package)| package.needs_update())
        .map(|(index, _)| index)
        .collect();

    match SelectionPolicy::from_options(options) {
        SelectionPolicy::Choose(choose) => {
            console.verbose_writeln("Selecting packages by provided `choose` function...");
            for &index in &candidates {
                packages[index].value =
                    choose(&packages[index], options).filter(|value| !value.is_empty());
            }
        }
        SelectionPolicy::ForceLatest => {
            console.verbose_writeln("Forced latest versions for every package.");
            for &index in &candidates {
                let package = &mut packages[index];
                package.value = latest_target(package, options);
                if let Some(value) = &package.value {
                    console.writeln(&format!(
                        "For {} version {} has been chosen.",
                        package.name.yellow(),
                        value.yellow()
                    ));
                }
            }
        }
        SelectionPolicy::Interactive => {
            let questions: Vec<ListQuestion> = candidates
                .iter()
                .map(|&index| build_question(&packages[index], options))
                .collect();
            if questions.is_empty() {
                return Ok(packages);
            }

            let answers = prompter.list_batch(&questions)?;
            for &index in &candidates {
                let key = packages[index].key();
                packages[index].value =
                    answers.get(&key).filter(|value| !value.is_empty()).cloned();
            }
        }
    }

    Ok(packages)
}
