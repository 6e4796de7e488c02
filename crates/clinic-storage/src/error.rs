//! Storage error types for the persistent map abstraction.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A collection file exists but does not hold a valid snapshot.
    #[error("Corrupt collection {collection}: {message}")]
    Corrupt {
        /// Name of the affected collection.
        collection: String,
        /// Description of the decoding failure.
        message: String,
    },

    /// The storage configuration cannot be used.
    #[error("Invalid storage configuration: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `Corrupt` error.
    #[must_use]
    pub fn corrupt(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::Infrastructure,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Corrupt { .. } => ErrorCategory::Corruption,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Filesystem or runtime failure.
    Infrastructure,
    /// Encoding/decoding failure.
    Serialization,
    /// Persisted data is unreadable.
    Corruption,
    /// Misconfiguration.
    Configuration,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Serialization => write!(f, "serialization"),
            Self::Corruption => write!(f, "corruption"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
