use thiserror::Error;

/// Core error types for clinic record operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid entity kind: {0}")]
    InvalidEntityKind(String),

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid query parameter {param}: {message}")]
    InvalidQuery { param: String, message: String },

    #[error("{kind} not found: {id}")]
    EntityNotFound { kind: String, id: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidEntityKind error
    pub fn invalid_entity_kind(kind: impl Into<String>) -> Self {
        Self::InvalidEntityKind(kind.into())
    }

    /// Create a new InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a new InvalidDate error
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate(value.into())
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp(value.into())
    }

    /// Create a new MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new InvalidField error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new InvalidQuery error
    pub fn invalid_query(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a new EntityNotFound error
    pub fn entity_not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::EntityNotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        !self.is_server_error()
    }

    /// Check if this error is a server error (5xx category)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::JsonError(_))
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidEntityKind(_)
            | Self::InvalidId(_)
            | Self::InvalidDate(_)
            | Self::InvalidTimestamp(_)
            | Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::InvalidQuery { .. } => ErrorCategory::Validation,
            Self::EntityNotFound { .. } => ErrorCategory::NotFound,
            Self::JsonError(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::NotFound => write!(f, "not_found"),
            ErrorCategory::Serialization => write!(f, "serialization"),
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::missing_field("name");
        assert_eq!(err.to_string(), "Missing required field: name");

        let err = CoreError::entity_not_found("Doctor", "abc");
        assert_eq!(err.to_string(), "Doctor not found: abc");

        let err = CoreError::invalid_field("scheduledAt", "must be RFC 3339");
        assert_eq!(err.to_string(), "Invalid field scheduledAt: must be RFC 3339");
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::missing_field("name").is_client_error());
        assert!(CoreError::entity_not_found("Patient", "1").is_client_error());

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CoreError::from(json_err);
        assert!(err.is_server_error());
        assert_eq!(err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            CoreError::invalid_query("page", "must be >= 1").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            CoreError::entity_not_found("Medication", "9").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
    }
}
