use chrono::{NaiveDate, NaiveTime};

use crate::error::ApiError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const USERNAME_LEN: (usize, usize) = (3, 50);
pub const MAX_PHONE_LEN: usize = 20;

/// Trimmed, non-empty, at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    bounded_text(field, value, max)
}

/// Trimmed, at most `max` characters, may be empty.
pub fn bounded_text(field: &str, value: &str, max: usize) -> Result<String, ApiError> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(ApiError::validation(format!("{field} must be at most {max} characters")));
    }
    Ok(value.to_string())
}

/// Patch fields that are missing or blank count as not given.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `YYYY-MM-DD`
pub fn date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("invalid {field}, use YYYY-MM-DD")))
}

/// `HH:MM`, normalised to two-digit hours.
pub fn time_of_day(field: &str, value: &str) -> Result<String, ApiError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| ApiError::validation(format!("invalid {field}, use HH:MM")))
}

pub fn password(field: &str, value: &str) -> Result<(), ApiError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "{field} must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn username(value: &str) -> Result<String, ApiError> {
    let (min, max) = USERNAME_LEN;
    let value = required_text("username", value, max)?;
    if value.chars().count() < min {
        return Err(ApiError::validation(format!("username must be at least {min} characters")));
    }
    Ok(value)
}

pub fn phone_number(value: &str) -> Result<String, ApiError> {
    required_text("phone_number", value, MAX_PHONE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rules() {
        assert_eq!(required_text("content", "  walk  ", 10).unwrap(), "walk");
        assert!(required_text("content", "   ", 10).is_err());
        assert!(required_text("content", "elevenchars", 10).is_err());
        assert_eq!(bounded_text("note", "", 10).unwrap(), "");
    }

    #[test]
    fn blank_patch_fields_are_absent() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(Some("  ".into())), None);
        assert_eq!(present(Some("x".into())), Some("x".into()));
    }

    #[test]
    fn dates_and_times() {
        assert_eq!(date("d", "2026-02-28").unwrap(), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert!(date("d", "2026-02-30").is_err());
        assert!(date("d", "28/02/2026").is_err());

        assert_eq!(time_of_day("t", "7:05").unwrap(), "07:05");
        assert_eq!(time_of_day("t", "23:59").unwrap(), "23:59");
        assert!(time_of_day("t", "24:00").is_err());
        assert!(time_of_day("t", "noon").is_err());
    }

    #[test]
    fn account_fields() {
        assert!(username("ab").is_err());
        assert_eq!(username(" abc ").unwrap(), "abc");
        assert!(username(&"x".repeat(51)).is_err());
        assert!(password("password", "12345").is_err());
        assert!(password("password", "123456").is_ok());
        assert!(phone_number("").is_err());
    }
}
