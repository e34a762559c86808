//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Values out of range
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use std::error::Error;

    fn missing() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "missing")
    }

    #[test]
    fn io_variants_carry_path_and_source() {
        let err = ConfigError::read_file("/scores/a.toml", missing());
        assert!(matches!(err, ConfigError::ReadFile { ref path, .. } if path.ends_with("a.toml")));
        assert!(err.to_string().contains("failed to read file"));
        assert!(err.source().is_some());

        let err = ConfigError::write_file("/out/b.toml", missing());
        assert!(err.to_string().contains("/out/b.toml"));
        assert!(err.source().is_some());

        let err = ConfigError::create_dir("/out", missing());
        assert!(err.to_string().starts_with("failed to create directory"));
    }

    #[test]
    fn toml_errors_convert() {
        let parse = toml::from_str::<toml::Table>("= nope").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(matches!(err, ConfigError::TomlParse(_)));
        assert!(err.to_string().starts_with("failed to parse TOML"));
    }

    #[test]
    fn validation_errors_convert() {
        let err: ConfigError = ValidationError::Invalid {
            field: "mode".to_string(),
            reason: "must be below 7".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "validation failed: invalid value for 'mode': must be below 7"
        );
    }
}
