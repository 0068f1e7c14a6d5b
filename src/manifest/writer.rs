//! Writing chosen targets back into the manifest
//!
//! This module provides:
//! - Merging resolved targets into their dependency sections
//! - Clearing stale resolutions
//! - Pretty JSON rendering and whole-file replacement

use crate::domain::Package;
use crate::error::ManifestError;
use crate::manifest::Manifest;
use std::fs;
use std::path::Path;

/// Merge packages into the manifest.
///
/// Every package is written back with its resolved target recomposed with
/// its source. Returns the number of packages whose target changed.
pub fn apply_packages(
    manifest: &mut Manifest,
    packages: &[Package],
    clear_resolutions: bool,
) -> Result<usize, ManifestError> {
    let mut updated = 0;

    for package in packages {
        manifest.set_dependency(package.section(), &package.name, package.endpoint().compose())?;

        if clear_resolutions {
            manifest.remove_resolution(&package.name);
        }

        if package.is_changed() {
            updated += 1;
        }
    }

    Ok(updated)
}

/// Render the manifest as two-space indented JSON with a trailing newline
pub fn render(manifest: &Manifest) -> Result<String, serde_json::Error> {
    let mut content = serde_json::to_string_pretty(manifest.as_json())?;
    content.push('\n');
    Ok(content)
}

/// Replace a file as a whole through a sibling temporary file
pub fn write_atomic(path: &Path, content: &str) -> Result<(), ManifestError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&temp_path, content).map_err(|e| ManifestError::write_error(path, e))?;
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ManifestError::write_error(path, e)
    })
}
