//! Lenient parsing for the string-encoded numeric fields of
//! [`PatientContext`](crate::models::patient::PatientContext).
//!
//! Interactive callers bind text fields directly, so blank or half-typed
//! values are normal and simply mean "unknown".

use crate::error::CoreError;

/// Parse an age in whole years. Blank, negative, or non-numeric input is unknown.
pub fn parse_age(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// Parse an MME value. Blank or non-numeric input is unknown; negatives are rejected.
pub fn parse_mme(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Strict variant used at input boundaries: blank is allowed, garbage is not.
pub fn validate_age(raw: &str) -> Result<Option<u32>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match parse_age(raw) {
        Some(age) if age <= 130 => Ok(Some(age)),
        _ => Err(CoreError::InvalidAge(raw.to_string())),
    }
}

/// Strict variant used at input boundaries: blank is allowed, garbage is not.
pub fn validate_mme(raw: &str) -> Result<Option<f64>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_mme(raw)
        .map(Some)
        .ok_or_else(|| CoreError::InvalidMme(raw.to_string()))
}
