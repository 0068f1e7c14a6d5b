//! Core domain models for bower-update
//!
//! This module contains the fundamental types used throughout the application:
//! - Endpoint decomposition of manifest entries into source and target
//! - Range target parsing and prefix detection
//! - Package descriptors carried through the update pipeline

mod endpoint;
mod package;
mod range;

pub use endpoint::{is_wildcard, Endpoint};
pub use package::{LatestInfo, Package, Section};
pub use range::{detect_range_char, parse_range};
