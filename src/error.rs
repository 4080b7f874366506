//! Error types for package-model-mcp.
//!
//! The geometry engine itself is infallible: generators and namers work on
//! typed configurations. Errors only arise at the boundaries, when a package
//! kind arrives as a loose string tag, when a settings file is loaded, or when
//! an export script is written to disk.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for package operations.
pub type PackageResult<T> = Result<T, PackageError>;

/// Errors raised by the package facade.
#[derive(Error, Debug)]
pub enum PackageError {
    /// The package kind tag is not one this crate implements.
    #[error("unrecognized package kind: {kind}")]
    UnrecognizedPackageKind {
        /// The tag that was received.
        kind: String,
    },

    /// A configuration of a known kind is malformed or violates an invariant.
    #[error("invalid package configuration field '{field}': {message}")]
    InvalidConfig {
        /// Dotted path of the offending field (e.g. `pad.pitch`).
        field: String,
        /// Description of the problem.
        message: String,
    },
}

impl PackageError {
    /// Creates an unrecognized package kind error.
    pub fn unrecognized(kind: impl Into<String>) -> Self {
        Self::UnrecognizedPackageKind { kind: kind.into() }
    }

    /// Creates an invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while writing an export script.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The script file could not be written.
    #[error("failed to write export script: {path}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_kind_display() {
        let err = PackageError::unrecognized("bga");
        assert_eq!(err.to_string(), "unrecognized package kind: bga");
    }

    #[test]
    fn invalid_config_display() {
        let err = PackageError::invalid("pad.pitch", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid package configuration field 'pad.pitch': must be greater than zero"
        );
    }

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn export_error_display() {
        let error = ExportError::Write {
            path: PathBuf::from("/tmp/out.py"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(error.to_string().contains("out.py"));
    }
}
