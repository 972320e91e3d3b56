//! Input validation utilities.
//!
//! Field-level checks shared by record validation, plus the guard that keeps collection
//! names safe to use as directory names.

use crate::{CoreError, CoreResult};
use chrono::NaiveDate;

/// Validates that a collection name is safe to embed in a filesystem path.
///
/// Only lowercase ASCII letters, digits and `_` are allowed, and the name is bounded in
/// length. This rules out separators, `..` and hidden directories.
pub fn validate_collection_name(name: &str) -> CoreResult<()> {
    const MAX_COLLECTION_LEN: usize = 64;

    if name.is_empty() || name.len() > MAX_COLLECTION_LEN {
        return Err(CoreError::NotAcceptable(format!(
            "collection name must be 1..={MAX_COLLECTION_LEN} characters"
        )));
    }

    let ok = name
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'_'));
    if !ok {
        return Err(CoreError::NotAcceptable(format!(
            "collection name '{name}' contains invalid characters"
        )));
    }

    Ok(())
}

/// Requires a non-blank field value.
pub fn require(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::NotAcceptable(format!("{field} is required")));
    }
    Ok(())
}

/// Parses an optional `YYYY-MM-DD` date. Blank values are `None`.
pub fn optional_date(field: &str, value: &str) -> CoreResult<Option<NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CoreError::NotAcceptable(format!("{field} must be YYYY-MM-DD, got '{trimmed}'")))
}

/// Checks that an end date does not precede a start date when both are present.
pub fn date_range(start_field: &str, start: &str, end_field: &str, end: &str) -> CoreResult<()> {
    let start_date = optional_date(start_field, start)?;
    let end_date = optional_date(end_field, end)?;
    if let (Some(s), Some(e)) = (start_date, end_date) {
        if e < s {
            return Err(CoreError::NotAcceptable(format!(
                "{end_field} must not be before {start_field}"
            )));
        }
    }
    Ok(())
}

/// Template variable names are restricted to `[A-Za-z0-9_]+`.
pub fn validate_variable_names(variables: &[String]) -> CoreResult<()> {
    for name in variables {
        let ok = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_');
        if !ok {
            return Err(CoreError::NotAcceptable(format!(
                "template variable '{name}' must match [A-Za-z0-9_]+"
            )));
        }
    }
    Ok(())
}
