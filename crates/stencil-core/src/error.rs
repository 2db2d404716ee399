//! Error types for the Stencil application.

use thiserror::Error;

/// A shared error type for the Stencil crates.
///
/// Session steps, the results directory, and the HTTPS server all report
/// failures through this enum so the binary can decide what is fatal.
#[derive(Error, Debug, Clone)]
pub enum StencilError {
    /// A file or directory the operation needed does not exist or cannot be opened
    #[error("{entity_type} not found: '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "PEM", etc.
        message: String,
    },

    /// A user supplied path was rejected before touching the filesystem
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TLS credential error
    #[error("TLS error: {0}")]
    Tls(String),

    /// The interactive prompt channel failed
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Well-formed input that has the wrong shape for its use
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StencilError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an InvalidPath error
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Tls error
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Creates an InvalidData error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Creates a Prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is an invalid data error
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, Self::InvalidData(_))
    }

    /// Check if this is an invalid path error
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath(_))
    }

    /// Builds an error from an IO failure on a known path.
    ///
    /// `NotFound` and `PermissionDenied` both become [`StencilError::NotFound`]:
    /// callers treat "missing" and "unreadable" the same way.
    pub fn from_io_at(entity_type: &'static str, path: impl Into<String>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                Self::not_found(entity_type, path)
            }
            _ => Self::from(err),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StencilError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StencilError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, StencilError>`.
pub type Result<T> = std::result::Result<T, StencilError>;
