//! Input-shape checks shared by the handlers.
//!
//! Limits come from `taskdeck_proto::model` so clients can enforce the
//! same contract. Violations surface as 400 with a field-naming message.

use crate::error::ApiError;

/// Requires a trimmed length within `[min, max]`.
///
/// # Errors
///
/// [`ApiError::Validation`] naming the field and its bounds.
pub fn length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(ApiError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Requires at least `min` characters.
///
/// # Errors
///
/// [`ApiError::Validation`] naming the field and its bound.
pub fn min_length(field: &str, value: &str, min: usize) -> Result<(), ApiError> {
    if value.chars().count() < min {
        return Err(ApiError::Validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

/// Requires at most `max` characters. Empty is allowed.
///
/// # Errors
///
/// [`ApiError::Validation`] naming the field and its bound.
pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Requires a plausibly shaped email address.
///
/// # Errors
///
/// [`ApiError::Validation`] when the shape is wrong.
pub fn email(value: &str) -> Result<(), ApiError> {
    let ok = value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    });
    if ok {
        Ok(())
    } else {
        Err(ApiError::Validation("email must be a valid email address".to_string()))
    }
}
