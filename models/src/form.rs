// models/src/form.rs

use crate::errors::{ValidationError, ValidationResult};

/// Returns the trimmed value, or `MissingField` when it is absent or blank.
pub fn required(value: Option<String>, field: &'static str) -> ValidationResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Trimmed value, `None` when absent or blank.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits a free-text comma list into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes the medical-history text area of the patient form.
pub fn parse_medical_history(input: &str) -> Vec<String> {
    split_list(input)
}

/// HTML checkboxes are only submitted when ticked.
pub fn checkbox(value: &Option<String>) -> bool {
    value.is_some()
}
