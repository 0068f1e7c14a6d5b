//! bower-update - bower.json dependency version updater library
//!
//! This library provides the pieces of an update run:
//! - Parsing declared targets and their range prefixes
//! - Looking up published versions in the bower registry
//! - Offering and choosing replacement targets
//! - Writing the chosen targets back into bower.json

pub mod cli;
pub mod console;
pub mod domain;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod options;
pub mod orchestrator;
pub mod progress;
pub mod prompt;
pub mod registry;
pub mod update;
