//! `.bowerrc` settings reader
//!
//! Reads the JSON settings file next to the manifest. Recognised keys:
//! - `registry`: an endpoint URL, or `{ "search": [url, ...] }` where the
//!   first entry wins
//! - `cwd`: manifest directory, relative to the settings file

use crate::error::ConfigError;
use crate::options::UpdateOptions;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Settings file name
pub const BOWERRC_FILENAME: &str = ".bowerrc";

/// Settings picked up from `.bowerrc`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BowerrcSettings {
    /// Registry endpoint
    pub registry: Option<String>,
    /// Directory holding the manifest
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegistrySetting {
    Url(String),
    Endpoints {
        #[serde(default)]
        search: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
struct RawBowerrc {
    #[serde(default)]
    registry: Option<RegistrySetting>,
    #[serde(default)]
    cwd: Option<String>,
}

impl BowerrcSettings {
    /// Read settings from a directory; a missing file means no settings
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(BOWERRC_FILENAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::InvalidBowerrc {
                    path,
                    message: e.to_string(),
                })
            }
        };

        Self::parse(dir, &path, &content)
    }

    fn parse(dir: &Path, path: &Path, content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawBowerrc =
            serde_json::from_str(content).map_err(|e| ConfigError::InvalidBowerrc {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let registry = match raw.registry {
            Some(RegistrySetting::Url(url)) => Some(url),
            Some(RegistrySetting::Endpoints { search }) => search.into_iter().next(),
            None => None,
        }
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

        Ok(Self {
            registry,
            cwd: raw.cwd.map(|cwd| dir.join(cwd)),
        })
    }

    /// Layer these settings over the given options
    pub fn apply_to(&self, mut options: UpdateOptions) -> UpdateOptions {
        if let Some(registry) = &self.registry {
            options.registry_url = registry.clone();
        }
        if let Some(cwd) = &self.cwd {
            options.cwd = cwd.clone();
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[test]
    fn test_missing_file() {
        let dir = create_temp_dir();
        let settings = BowerrcSettings::from_dir(dir.path()).unwrap();
        assert_eq!(settings, BowerrcSettings::default());
    }

    #[test]
    fn test_empty_file() {
        let dir = create_temp_dir();
        fs::write(dir.path().join(".bowerrc"), "  \n").unwrap();
        let settings = BowerrcSettings::from_dir(dir.path()).unwrap();
        assert_eq!(settings, BowerrcSettings::default());
    }

    #[test]
    fn test_registry_string() {
        let dir = create_temp_dir();
        fs::write(
            dir.path().join(".bowerrc"),
            r#"{"registry": "https://bower.example.com"}"#,
        )
        .unwrap();
        let settings = BowerrcSettings::from_dir(dir.path()).unwrap();
        assert_eq!(settings.registry.as_deref(), Some("https://bower.example.com"));
    }

    #[test]
    fn test_registry_search_first_wins() {
        let dir = create_temp_dir();
        fs::write(
            dir.path().join(".bowerrc"),
            r#"{"registry": {"search": ["https://first.example.com", "https://second.example.com"]}}"#,
        )
        .unwrap();
        let settings = BowerrcSettings::from_dir(dir.path()).unwrap();
        assert_eq!(settings.registry.as_deref(), Some("https://first.example.com"));
    }

    #[test]
    fn test_registry_search_empty() {
        let dir = create_temp_dir();
        fs::write(dir.path().join(".bowerrc"), r#"{"registry": {"search": []}}"#).unwrap();
        let settings = BowerrcSettings::from_dir(dir.path()).unwrap();
        assert!(settings.registry.is_none());
    }

    #[test]
    fn test_cwd_relative_to_file() {
        let dir = create_temp_dir();
        fs::write(dir.path().join(".bowerrc"), r#"{"cwd": "web"}"#).unwrap();
        let settings = BowerrcSettings::from_dir(dir.path()).unwrap();
        assert_eq!(settings.cwd, Some(dir.path().join("web")));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = create_temp_dir();
        fs::write(
            dir.path().join(".bowerrc"),
            r#"{"directory": "vendor", "analytics": false}"#,
        )
        .unwrap();
        assert!(BowerrcSettings::from_dir(dir.path()).is_ok());
    }

    #[test]
    fn test_invalid_json() {
        let dir = create_temp_dir();
        fs::write(dir.path().join(".bowerrc"), "{ registry").unwrap();
        let err = BowerrcSettings::from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("invalid settings"));
    }

    #[test]
    fn test_apply_to_options() {
        let settings = BowerrcSettings {
            registry: Some("https://bower.example.com".to_string()),
            cwd: Some(PathBuf::from("/project/web")),
        };
        let options = settings.apply_to(UpdateOptions::new());
        assert_eq!(options.registry_url, "https://bower.example.com");
        assert_eq!(options.cwd, PathBuf::from("/project/web"));

        let untouched = BowerrcSettings::default().apply_to(UpdateOptions::new().with_cwd("/a"));
        assert_eq!(untouched.cwd, PathBuf::from("/a"));
    }
}
