//! Error types for the QA store.

use thiserror::Error;

/// Top-level result type for QA store operations.
pub type Result<T> = std::result::Result<T, QaError>;

/// Top-level error type for the QA store.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`QaError`], used by callers that map
/// failures onto a transport (HTTP status, process exit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    MethodNotAllowed,
    Internal,
}

impl QaError {
    /// Classify this error. I/O and serialization failures are internal.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
            Self::Io(_) | Self::Serialization(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for QaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Reject identifiers that would escape their directory when joined into a path.
///
/// # Errors
///
/// Returns [`QaError::InvalidArgument`] if `id` is empty, contains a path
/// separator, or is a relative path component.
pub fn validate_id(field: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(QaError::InvalidArgument(format!("{field} is required")));
    }
    if id.contains('/') || id.contains('\\') || id == "." || id.contains("..") {
        return Err(QaError::InvalidArgument(format!(
            "{field} '{id}' contains path characters"
        )));
    }
    Ok(())
}
