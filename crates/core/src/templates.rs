//! Notification template rendering.
//!
//! Templates declare the variables they use; placeholders are written `{{name}}`. Rendering
//! first checks that every declared variable was supplied, then substitutes.

use crate::{CoreError, CoreResult};
use std::collections::HashMap;

/// Returns the declared variables missing from `supplied`, in declaration order.
pub fn missing_variables<'a>(
    declared: &'a [String],
    supplied: &HashMap<String, String>,
) -> Vec<&'a str> {
    declared
        .iter()
        .filter(|name| !supplied.contains_key(name.as_str()))
        .map(String::as_str)
        .collect()
}

/// Fails with `FailedPrecondition` naming every missing variable.
pub fn check_variables(declared: &[String], supplied: &HashMap<String, String>) -> CoreResult<()> {
    let missing = missing_variables(declared, supplied);
    if missing.is_empty() {
        return Ok(());
    }
    Err(CoreError::FailedPrecondition(format!(
        "missing template variables: {}",
        missing.join(", ")
    )))
}

/// Replaces every `{{name}}` placeholder whose name is in `variables`.
///
/// Whitespace inside the braces is ignored. Unknown placeholders are left untouched.
pub fn render(text: &str, variables: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let name = after_open[..end].trim();
                match variables.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
