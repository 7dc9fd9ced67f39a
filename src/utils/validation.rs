//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits mirror the registration form used at the front desk and
//! the column widths the legacy admin panel renders.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Member and father names
pub const MAX_NAME_LEN: usize = 25;

/// Contact phone numbers (Indian mobile without country code)
pub const MAX_CONTACT_LEN: usize = 10;

/// Aadhar numbers (12 digits plus optional separators)
pub const MAX_AADHAR_LEN: usize = 14;

/// Postal addresses
pub const MAX_ADDRESS_LEN: usize = 50;

/// Plan duration labels ("6 Months", "8 AM - 2 PM", ...)
pub const MAX_TIMING_LEN: usize = 50;

/// Admin login emails (RFC 5321 ceiling)
pub const MAX_EMAIL_LEN: usize = 254;

/// Raw admin passwords prior to Argon2 hashing
pub const MAX_PASSWORD_LEN: usize = 128;

/// Free-form notes on payments
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Reject an empty or overlong required field.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Length-check an optional field, skipping `None`.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate an HH:MM time string (custom shift boundaries).
pub fn validate_hhmm(value: &str, field: &str) -> Result<(), AppError> {
    if super::time::parse_hhmm(value).is_none() {
        return Err(AppError::validation(format!(
            "{field} must be a valid HH:MM time"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_overlong() {
        assert!(validate_required_text("Asha", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(26), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("y".repeat(501)), "notes", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn hhmm_validation() {
        assert!(validate_hhmm("08:00", "customStartTime").is_ok());
        assert!(validate_hhmm("8am", "customStartTime").is_err());
    }
}
