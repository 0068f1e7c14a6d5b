//! Interactive prompt service
//!
//! This module provides:
//! - Question types for the package multi-select and the per-package
//!   target questions
//! - The Prompter trait the pipeline asks through
//! - A line-oriented terminal implementation

mod terminal;

pub use terminal::TerminalPrompter;

use crate::error::PromptError;
use std::collections::HashMap;

/// A pre-checkable entry of a checkbox question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxItem {
    /// Highlighted label
    pub name: String,
    /// Secondary text shown after the label
    pub detail: String,
    /// Initial state
    pub checked: bool,
}

/// Items shown under a common heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxGroup {
    /// Heading, e.g. `dependencies:`
    pub title: String,
    /// Entries of the group
    pub items: Vec<CheckboxItem>,
}

/// Multi-select question over grouped items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxQuestion {
    /// Question text
    pub message: String,
    /// Groups in display order
    pub groups: Vec<CheckboxGroup>,
}

impl CheckboxQuestion {
    /// All items in display order; answers index into this sequence
    pub fn items(&self) -> impl Iterator<Item = &CheckboxItem> {
        self.groups.iter().flat_map(|group| group.items.iter())
    }

    /// Number of selectable items
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }
}

/// Entry of a single-choice question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChoice {
    /// Non-selectable informational line
    Separator(String),
    /// Selectable value
    Value {
        /// Value returned when chosen
        value: String,
        /// Text shown after the value
        description: Option<String>,
    },
}

impl ListChoice {
    /// Creates a selectable value
    pub fn value(value: impl Into<String>, description: Option<&str>) -> Self {
        ListChoice::Value {
            value: value.into(),
            description: description.map(String::from),
        }
    }
}

/// Single-choice question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuestion {
    /// Key of the answer in the batch result
    pub name: String,
    /// Question text
    pub message: String,
    /// Entries in display order
    pub choices: Vec<ListChoice>,
    /// Preferred answer
    pub default: String,
}

impl ListQuestion {
    /// Selectable values in display order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().filter_map(|choice| match choice {
            ListChoice::Value { value, .. } => Some(value.as_str()),
            ListChoice::Separator(_) => None,
        })
    }

    /// Position of the default among the values; the first value when absent
    pub fn default_index(&self) -> usize {
        self.values()
            .position(|value| value == self.default)
            .unwrap_or(0)
    }
}

/// Prompt service used by the pipeline
pub trait Prompter: Send {
    /// Asks a multi-select question and returns the indices of checked items
    fn checkbox(&mut self, question: &CheckboxQuestion) -> Result<Vec<usize>, PromptError>;

    /// Asks all questions as one batch and returns answers keyed by question name
    fn list_batch(
        &mut self,
        questions: &[ListQuestion],
    ) -> Result<HashMap<String, String>, PromptError>;
}
