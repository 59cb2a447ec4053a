//! Shared input validation. Every request-facing id, text and amount check
//! lives here so handlers and services agree on what malformed input is,
//! and validation always runs before any I/O.

use crate::errors::ValidationError;

pub type ValidationResult = std::result::Result<(), ValidationError>;

const MAX_ID_LEN: usize = 128;

/// Ids are non-empty, bounded, and limited to url-safe characters.
pub fn require_id(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    if value.len() > MAX_ID_LEN {
        return Err(ValidationError::InvalidInput(format!(
            "{} exceeds {} characters",
            field, MAX_ID_LEN
        )));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidInput(format!(
            "{} contains invalid characters",
            field
        )));
    }
    Ok(())
}

/// Free text: non-empty after trimming, bounded length.
pub fn require_text(field: &str, value: &str, max_chars: usize) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    if value.chars().count() > max_chars {
        return Err(ValidationError::InvalidInput(format!(
            "{} exceeds {} characters",
            field, max_chars
        )));
    }
    Ok(())
}

/// A ratio in [0, 1], finite.
pub fn require_unit_interval(field: &str, value: f64) -> ValidationResult {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange(format!(
            "{} must be within [0, 1], got {}",
            field, value
        )));
    }
    Ok(())
}

/// A finite, non-negative amount.
pub fn require_non_negative(field: &str, value: f64) -> ValidationResult {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::OutOfRange(format!(
            "{} must be non-negative, got {}",
            field, value
        )));
    }
    Ok(())
}
