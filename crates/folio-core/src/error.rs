//! Error types for Folio operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Folio crates. Uses `thiserror` for derive macros.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in Folio operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific file.
    #[error("I/O error on {}: {source}", path.display())]
    IoWithPath {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request path that is empty, absolute, or climbs out of its root.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    ///
    /// `NotFound` I/O errors become [`Error::NotFound`] so callers can
    /// tell a missing document from an unreadable one.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if err.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound(path.display().to_string());
        }
        Self::IoWithPath {
            path: path.to_path_buf(),
            source: err,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid path error.
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Whether this error means the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error was caused by bad caller input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidPath(_))
    }
}

/// Result type alias using Folio's Error type.
pub type Result<T> = std::result::Result<T, Error>;
