//! Common validation utilities.

use validator::ValidationError;

/// Westernmost UTC offset in use (UTC-12:00), in minutes.
pub const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;

/// Easternmost UTC offset in use (UTC+14:00), in minutes.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Maximum length of a free-text event search.
pub const MAX_SEARCH_TEXT_LENGTH: usize = 100;

/// Validates that a UTC offset (minutes east of UTC) is a real-world offset.
pub fn validate_utc_offset_minutes(minutes: i32) -> Result<(), ValidationError> {
    if (MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        let mut err = ValidationError::new("utc_offset_range");
        err.message = Some("UTC offset must be between -720 and 840 minutes".into());
        Err(err)
    }
}

/// Validates that a search string is not blank and not overly long.
pub fn validate_search_text(text: &str) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("search_blank");
        err.message = Some("Search text cannot be blank".into());
        return Err(err);
    }
    if trimmed.chars().count() > MAX_SEARCH_TEXT_LENGTH {
        let mut err = ValidationError::new("search_length");
        err.message = Some("Search text must be at most 100 characters".into());
        return Err(err);
    }
    Ok(())
}
