//! Validation utilities for the Taxi Service
//!
//! Plain functions return `Result<_, &'static str>` so they can be reused
//! from the WASM module; the `*_field` adapters wire them into
//! `#[derive(Validate)]` form types.

use std::borrow::Cow;

use validator::ValidationError;

// ============================================================================
// License Number
// ============================================================================

/// Total length of a license number
pub const LICENSE_NUMBER_LENGTH: usize = 8;

/// Number of leading uppercase letters in a license number
const LICENSE_LETTER_COUNT: usize = 3;

/// Validate a driving license number: three uppercase ASCII letters followed
/// by five ASCII digits (e.g. `ABC12345`).
///
/// Returns the input unchanged on success.
pub fn validate_license_number(value: &str) -> Result<&str, &'static str> {
    if value.chars().count() != LICENSE_NUMBER_LENGTH {
        return Err("License number should consist of 8 characters");
    }

    if !value
        .chars()
        .take(LICENSE_LETTER_COUNT)
        .all(|c| c.is_ascii_uppercase())
    {
        return Err("First 3 characters should be uppercase letters");
    }
    if !value
        .chars()
        .skip(LICENSE_LETTER_COUNT)
        .all(|c| c.is_ascii_digit())
    {
        return Err("Last 5 characters should be digits");
    }

    Ok(value)
}

// ============================================================================
// Account Validations
// ============================================================================

/// Maximum username length
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Validate a username: 1-150 letters, digits and `@ . + - _`
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() {
        return Err("This field is required.");
    }
    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err("Ensure this value has at most 150 characters.");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err("This password is too short. It must contain at least 8 characters.");
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("This password is entirely numeric.");
    }
    Ok(())
}

// ============================================================================
// Form Field Adapters
// ============================================================================

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Field adapter for [`validate_license_number`]
pub fn license_number_field(value: &str) -> Result<(), ValidationError> {
    validate_license_number(value)
        .map(|_| ())
        .map_err(|msg| field_error("license_number", msg))
}

/// Field adapter for [`validate_username`]
pub fn username_field(value: &str) -> Result<(), ValidationError> {
    validate_username(value).map_err(|msg| field_error("username", msg))
}

/// Rejects empty and whitespace-only values
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", "This field is required."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_license_number_is_returned_unchanged() {
        assert_eq!(validate_license_number("AAA12345"), Ok("AAA12345"));
        assert_eq!(validate_license_number("GTR12345"), Ok("GTR12345"));
    }

    #[test]
    fn test_invalid_license_numbers() {
        assert!(validate_license_number("AAa12345").is_err());
        assert!(validate_license_number("AA12345").is_err()); // Too short
        assert!(validate_license_number("aaa12345").is_err()); // Lowercase
        assert!(validate_license_number("AAA1234").is_err()); // Too short
        assert!(validate_license_number("AAA1234a").is_err()); // Letter in digits
        assert!(validate_license_number("AAA123456").is_err()); // Too long
        assert!(validate_license_number("").is_err());
        assert!(validate_license_number("AAAA2345").is_err()); // Wrong split
        assert!(validate_license_number("AA-12345").is_err()); // Special char
    }

    #[test]
    fn test_license_error_messages() {
        assert_eq!(
            validate_license_number("AAA123456"),
            Err("License number should consist of 8 characters")
        );
        assert_eq!(
            validate_license_number("aaa12345"),
            Err("First 3 characters should be uppercase letters")
        );
        assert_eq!(
            validate_license_number("AAA1234a"),
            Err("Last 5 characters should be digits")
        );
    }

    #[test]
    fn test_license_rejects_non_ascii() {
        // Eight chars, but the letters are not ASCII
        assert!(validate_license_number("ÄBC12345").is_err());
        // Eight chars, but the digits are not ASCII
        assert!(validate_license_number("ABC1234٣").is_err());
    }

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("john.doe+taxi@fleet_1").is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password("Test12345678").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("1234567890").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }
}
