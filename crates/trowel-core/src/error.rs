//! Error types for trowel-core.

use std::path::{Path, PathBuf};

/// Errors raised by the domain model, geometry and configuration layers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A request or model value is out of its allowed range.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation, when known
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// Obstacle geometry could not be parsed or does not fit the wall.
    #[error("Invalid obstacle geometry: {message}")]
    Geometry {
        /// What is wrong with the geometry
        message: String,
    },

    /// Configuration could not be loaded, parsed or resolved.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// A service is not (or no longer) able to serve.
    #[error("Service '{service}' unavailable: {message}")]
    Unavailable {
        /// Service name
        service: String,
        /// Current state or failure reason
        message: String,
    },

    /// I/O error tied to a specific file.
    #[error("I/O error at {}: {source}", path.display())]
    IoPath {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// I/O error without path context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` alias for trowel-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a validation error without a field name.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a validation error for a named field.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a geometry error.
    pub fn geometry<S: Into<String>>(message: S) -> Self {
        Error::Geometry {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an unavailable-service error.
    pub fn unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Unavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns `true` for errors caused by caller input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::Geometry { .. })
    }
}
