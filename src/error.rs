//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Locating, parsing or writing bower.json
//! - RegistryError: Looking up versions for a dependency source
//! - PromptError: Interactive selection was aborted or failed
//! - ConfigError: Invalid .bowerrc settings

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Registry lookup errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Prompt errors
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No manifest file in the working directory
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// A dependency entry is not a string
    #[error("invalid entry '{name}' in {section}: {message}")]
    InvalidDependency {
        section: String,
        name: String,
        message: String,
    },

    /// A dependency section is not an object
    #[error("section '{section}' must be an object")]
    InvalidSection { section: String },
}

/// Errors related to registry lookups
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not registered
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Listing tags of a git remote failed
    #[error("failed to list versions of {remote}: {message}")]
    GitError { remote: String, message: String },

    /// A lookup for one package failed, aborting the batch
    #[error("{package}: {source}")]
    LookupFailed {
        package: String,
        #[source]
        source: Box<RegistryError>,
    },
}

/// Errors raised by the prompt service
#[derive(Error, Debug)]
pub enum PromptError {
    /// The operator aborted the selection
    #[error("selection cancelled")]
    Cancelled,

    /// Terminal IO failed
    #[error("prompt IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// .bowerrc is not valid JSON
    #[error("invalid settings in {path}: {message}")]
    InvalidBowerrc { path: PathBuf, message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidDependency error
    pub fn invalid_dependency(
        section: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ManifestError::InvalidDependency {
            section: section.into(),
            name: name.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new GitError
    pub fn git_error(remote: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::GitError {
            remote: remote.into(),
            message: message.into(),
        }
    }

    /// Wraps an error with the name of the package whose lookup failed
    pub fn lookup_failed(package: impl Into<String>, source: RegistryError) -> Self {
        RegistryError::LookupFailed {
            package: package.into(),
            source: Box::new(source),
        }
    }
}
