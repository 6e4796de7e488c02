use thiserror::Error;

/// Longest identifier accepted in a path segment.
pub const MAX_ID_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("ID must not be empty")]
    Empty,
    #[error("ID exceeds {MAX_ID_LEN} characters")]
    TooLong,
    #[error("ID contains invalid character '{0}'")]
    InvalidChar(char),
}

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Checks an identifier taken from a request path.
///
/// Generated ids are UUIDs, but ids are otherwise opaque: any run of ASCII
/// alphanumerics, `-`, `_` or `.` is accepted so stored data from older
/// deployments stays addressable.
pub fn validate_id(id: &str) -> Result<(), IdError> {
    if id.is_empty() {
        return Err(IdError::Empty);
    }
    if id.len() > MAX_ID_LEN {
        return Err(IdError::TooLong);
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(IdError::InvalidChar(c));
    }
    Ok(())
}
