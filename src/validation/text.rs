use url::Url;

use crate::error::ApiError;

/// Punctuation admitted in user-supplied text fields on top of letters,
/// digits and spaces. Anything outside the class is rejected before a query
/// or a write ever runs.
const ALLOWED_PUNCTUATION: &str = ".,-()/'&!?";

const MAX_TEXT_LENGTH: usize = 255;

fn char_allowed(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || ALLOWED_PUNCTUATION.contains(c)
}

/// Validate a required text field (titles, names, filter values) against the
/// allow-listed character class.
pub fn validate_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid_field(field, "must not be blank"));
    }
    if value.len() > MAX_TEXT_LENGTH {
        return Err(ApiError::invalid_field(
            field,
            format!("must be at most {} characters", MAX_TEXT_LENGTH),
        ));
    }
    if let Some(bad) = value.chars().find(|c| !char_allowed(*c)) {
        return Err(ApiError::invalid_field(
            field,
            format!("contains forbidden character '{}'", bad),
        ));
    }
    Ok(())
}

/// Same as [`validate_text`] but tolerates an absent value.
pub fn validate_optional_text(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(v) => validate_text(field, v),
        None => Ok(()),
    }
}

/// Http refs must point at an absolute http(s) URL.
pub fn validate_url_field(field: &str, value: &str) -> Result<(), ApiError> {
    let parsed = Url::parse(value)
        .map_err(|_| ApiError::invalid_field(field, "must be a valid absolute URL"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ApiError::invalid_field(
            field,
            format!("unsupported URL scheme '{}'", other),
        )),
    }
}
