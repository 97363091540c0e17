//! Small request-field checks shared by the engine APIs and the HTTP layer.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FieldError(pub String);

/// Returns the trimmed value of a required field.
pub fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, FieldError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FieldError(format!("'{name}' is required"))),
    }
}

pub fn min_length<'a>(name: &str, value: &'a Option<String>, min: usize) -> Result<&'a str, FieldError> {
    let v = required(name, value)?;
    if v.chars().count() < min {
        return Err(FieldError(format!("'{name}' must be {min} or more characters")));
    }
    Ok(v)
}

/// Like [`min_length`], but a missing or blank field is fine.
pub fn optional_min_length(name: &str, value: &Option<String>, min: usize) -> Result<Option<String>, FieldError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(_) => min_length(name, value, min).map(|v| Some(v.to_string())),
    }
}
