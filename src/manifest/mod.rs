//! bower.json access
//!
//! This module provides:
//! - The Manifest document with its dependency sections
//! - Locating, reading and writing the manifest through ManifestStore
//! - Merging chosen targets back into the document
//! - `.bowerrc` settings

mod bowerrc;
mod writer;

pub use bowerrc::BowerrcSettings;
pub use writer::{apply_packages, render, write_atomic};

use crate::domain::Section;
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file names, in lookup order
pub const MANIFEST_FILENAMES: [&str; 3] = ["bower.json", "component.json", ".bower.json"];

const RESOLUTIONS_KEY: &str = "resolutions";

/// A parsed bower.json document, key order preserved
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    json: Map<String, Value>,
}

impl Manifest {
    /// Parse manifest content; the document must be a JSON object
    pub fn parse(path: &Path, content: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

        match value {
            Value::Object(json) => Ok(Self { json }),
            _ => Err(ManifestError::json_parse_error(
                path,
                "top-level value must be an object",
            )),
        }
    }

    /// The underlying JSON object
    pub fn as_json(&self) -> &Map<String, Value> {
        &self.json
    }

    /// Dependency entries of a section in document order.
    ///
    /// A missing section yields no entries.
    pub fn entries(&self, section: Section) -> Result<Vec<(String, String)>, ManifestError> {
        let map = match self.json.get(section.key()) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(ManifestError::InvalidSection {
                    section: section.key().to_string(),
                })
            }
        };

        map.iter()
            .map(|(name, value)| match value {
                Value::String(value) => Ok((name.clone(), value.clone())),
                other => Err(ManifestError::invalid_dependency(
                    section.key(),
                    name,
                    format!("expected a string, found {}", other),
                )),
            })
            .collect()
    }

    /// Set a dependency value, creating the section when missing
    pub fn set_dependency(
        &mut self,
        section: Section,
        name: &str,
        value: String,
    ) -> Result<(), ManifestError> {
        let entry = self
            .json
            .entry(section.key())
            .or_insert_with(|| Value::Object(Map::new()));

        match entry {
            Value::Object(map) => {
                map.insert(name.to_string(), Value::String(value));
                Ok(())
            }
            _ => Err(ManifestError::InvalidSection {
                section: section.key().to_string(),
            }),
        }
    }

    /// Current value of a dependency
    pub fn dependency(&self, section: Section, name: &str) -> Option<&str> {
        self.json
            .get(section.key())
            .and_then(|map| map.get(name))
            .and_then(Value::as_str)
    }

    /// Drop the resolution pinned for `name`; returns whether one existed
    pub fn remove_resolution(&mut self, name: &str) -> bool {
        self.json
            .get_mut(RESOLUTIONS_KEY)
            .and_then(Value::as_object_mut)
            .is_some_and(|resolutions| resolutions.shift_remove(name).is_some())
    }

    /// Resolution pinned for `name`
    pub fn resolution(&self, name: &str) -> Option<&Value> {
        self.json.get(RESOLUTIONS_KEY).and_then(|r| r.get(name))
    }
}

/// Storage of the manifest document
pub trait ManifestStore: Send + Sync {
    /// Find the manifest in a directory
    fn locate(&self, cwd: &Path) -> Result<PathBuf, ManifestError>;

    /// Read and parse the manifest
    fn read(&self, path: &Path) -> Result<Manifest, ManifestError>;

    /// Replace the manifest content as a whole
    fn write(&self, path: &Path, content: &str) -> Result<(), ManifestError>;
}

/// Manifest store on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsManifestStore;

impl ManifestStore for FsManifestStore {
    fn locate(&self, cwd: &Path) -> Result<PathBuf, ManifestError> {
        MANIFEST_FILENAMES
            .iter()
            .map(|name| cwd.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| ManifestError::not_found(cwd.join(MANIFEST_FILENAMES[0])))
    }

    fn read(&self, path: &Path) -> Result<Manifest, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        Manifest::parse(path, &content)
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), ManifestError> {
        write_atomic(path, content)
    }
}
