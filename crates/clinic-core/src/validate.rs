//! Presence checks for incoming payloads.
//!
//! Type checks happen during deserialization (a number where a string is
//! expected, a malformed date, a missing required field). What remains here
//! is the check serde cannot express: required text must not be blank, and
//! optional text, when sent, must not be blank either.

use crate::error::{CoreError, Result};

/// Payload-level validation run after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Fails when a required text field is empty or whitespace only.
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::missing_field(field));
    }
    Ok(())
}

/// Fails when an optional text field is present but blank.
pub fn optional_text(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if v.trim().is_empty() => Err(CoreError::invalid_field(field, "must not be blank")),
        _ => Ok(()),
    }
}

/// Case-insensitive equality used by list filters. `None` matches anything.
pub(crate) fn matches_exact(filter: Option<&str>, value: &str) -> bool {
    filter.is_none_or(|f| f.eq_ignore_ascii_case(value))
}

/// Same as [`matches_exact`] for optional entity fields; a set filter never
/// matches an absent value.
pub(crate) fn matches_exact_opt(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => value.is_some_and(|v| f.eq_ignore_ascii_case(v)),
    }
}

/// Case-insensitive substring match used by name filters.
pub(crate) fn matches_substring(filter: Option<&str>, value: &str) -> bool {
    filter.is_none_or(|f| value.to_lowercase().contains(&f.to_lowercase()))
}

/// Exact, case-sensitive match for identifier filters.
pub(crate) fn matches_id(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => value == Some(f),
    }
}
