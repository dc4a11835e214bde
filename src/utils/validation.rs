//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Regex for "HH:MM" 24h times of day
static TIME_OF_DAY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap()
});

/// Regex for organization slugs
static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap()
});

/// Validate a time of day in "HH:MM" 24h notation
pub fn validate_time_of_day(value: &str) -> bool {
    TIME_OF_DAY_REGEX.is_match(value)
}

/// Validate an organization slug
pub fn validate_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= 64 && SLUG_REGEX.is_match(slug)
}

/// `validator` hook for optional "HH:MM" request fields
pub fn time_of_day_field(value: &str) -> Result<(), ValidationError> {
    if validate_time_of_day(value) {
        Ok(())
    } else {
        Err(ValidationError::new("time_of_day")
            .with_message(format!("'{}' is not a valid HH:MM time", value).into()))
    }
}

/// `validator` hook for organization slugs
pub fn slug_field(value: &str) -> Result<(), ValidationError> {
    if validate_slug(value) {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("slug must be lowercase letters, digits and single hyphens".into()))
    }
}
