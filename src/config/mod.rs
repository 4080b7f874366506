//! Settings file loading.
//!
//! Lookup order:
//!
//! 1. The `CONFIG_FILE` argument, which must exist
//! 2. `config.json` in [`default_config_dir`], if present
//! 3. Built-in defaults
//!
//! See `config/example-config.json` for every supported field.

mod settings;

pub use settings::{Config, ExportConfig, HexColor, LogLevel, LoggingConfig, PackageSettings};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Per-user settings directory, `~/.package-model-mcp` (`%USERPROFILE%` on Windows).
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".package-model-mcp"))
}

/// `config.json` inside [`default_config_dir`].
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join("config.json"))
}

/// Loads settings from `path`, or from the default location when `None`.
///
/// # Errors
///
/// - [`ConfigError::NotFound`] if an explicit `path` does not exist
/// - [`ConfigError::ReadError`] / [`ConfigError::ParseError`] for an
///   unreadable or malformed file
/// - [`ConfigError::ValidationError`] if [`Config::validate`] fails
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(explicit) if explicit.exists() => explicit.to_path_buf(),
        Some(explicit) => {
            return Err(ConfigError::NotFound {
                path: explicit.to_path_buf(),
            })
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(found) => found,
            None => {
                tracing::debug!("No settings file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
        path: path.clone(),
        source,
    })?;
    let config: Config =
        serde_json::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.clone(),
            source,
        })?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Loaded settings");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PackageKind;

    #[test]
    fn default_path_is_under_home() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with(".package-model-mcp/config.json"));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "package": { "default_kind": "wson" } }"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.package.default_kind, PackageKind::Wson);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn invalid_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "allowed_paths": [""] }"#).unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
