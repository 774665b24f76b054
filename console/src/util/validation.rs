//! Field validators shared by the entity forms.
//!
//! Every validator returns the caller-supplied Spanish message on failure so
//! each form keeps control of its own wording.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use time::Date;
use time::macros::format_description;

/// Trimmed non-empty text.
///
/// # Errors
///
/// Returns `message` when the trimmed value is empty.
pub fn required(value: &str, message: &'static str) -> Result<String, &'static str> {
    let value = value.trim();
    if value.is_empty() { Err(message) } else { Ok(value.to_owned()) }
}

/// A selected id: a positive integer in text form.
///
/// # Errors
///
/// Returns `message` when the value is empty, non-numeric or not positive.
pub fn required_id(value: &str, message: &'static str) -> Result<i64, &'static str> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(message),
    }
}

/// An optional selection; empty means "none".
///
/// # Errors
///
/// Returns `message` when a non-empty value is not a positive integer.
pub fn optional_id(value: &str, message: &'static str) -> Result<Option<i64>, &'static str> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    required_id(value, message).map(Some)
}

/// # Errors
///
/// Returns `message` for empty, non-integer or negative input.
pub fn non_negative_int(value: &str, message: &'static str) -> Result<i64, &'static str> {
    match value.trim().parse::<i64>() {
        Ok(number) if number >= 0 => Ok(number),
        _ => Err(message),
    }
}

/// # Errors
///
/// Returns `message` for empty, non-finite or negative input.
pub fn non_negative_number(value: &str, message: &'static str) -> Result<f64, &'static str> {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => Ok(number),
        _ => Err(message),
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, c)| c == '.' && index > 0 && index + 1 < domain.len())
}

/// Calendar date in `YYYY-MM-DD` form.
#[must_use]
pub fn is_iso_date(value: &str) -> bool {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).is_ok()
}

/// Five whitespace-separated cron fields (minute hour day month weekday).
///
/// Only the character set is checked; value ranges are the scheduler's job.
#[must_use]
pub fn is_cron_expression(value: &str) -> bool {
    let fields: Vec<&str> = value.split_whitespace().collect();
    fields.len() == 5
        && fields.iter().all(|field| {
            field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '*' | '/' | ',' | '-' | '?'))
        })
}

/// Parse a checkbox value: `true/false`, `1/0`, `si/sí/no`, `on/off`.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "si" | "sí" | "on" | "yes" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// MIME type for an uploaded logo, by file extension.
#[must_use]
pub fn mime_for(filename: &str) -> &'static str {
    let extension = filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
