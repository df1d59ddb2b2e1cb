//! License number and driver form tests
//!
//! Property tests for the license number format and the driver forms
//! that carry it.

use proptest::prelude::*;
use shared::{validate_license_number, DriverCreationForm, DriverLicenseUpdateForm};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Three uppercase letters followed by five digits
fn valid_license_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{3}[0-9]{5}"
}

/// Arbitrary short strings, including non-ASCII
fn any_short_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9]{0,12}",
        "\\PC{0,10}",
        "[A-Z]{3}[0-9a-z ]{5}",
        "[A-Za-z]{3}[0-9]{5}",
    ]
}

/// Usernames accepted by the driver form
fn username_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.@+-]{2,20}"
}

fn password_strategy() -> impl Strategy<Value = String> {
    "[a-z]{4}[A-Za-z0-9!#%]{4,16}"
}

fn matches_format(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    chars.len() == 8
        && chars[..3].iter().all(|c| c.is_ascii_uppercase())
        && chars[3..].iter().all(|c| c.is_ascii_digit())
}

proptest! {
    #[test]
    fn prop_valid_license_is_returned_unchanged(license in valid_license_strategy()) {
        prop_assert_eq!(validate_license_number(&license), Ok(license.as_str()));
    }

    #[test]
    fn prop_validator_accepts_exactly_the_format(s in any_short_string()) {
        prop_assert_eq!(validate_license_number(&s).is_ok(), matches_format(&s));
    }

    #[test]
    fn prop_wrong_length_reports_length_first(s in "[a-z0-9]{0,7}|[A-Z]{3}[0-9]{6,9}") {
        prop_assert_eq!(
            validate_license_number(&s),
            Err("License number should consist of 8 characters")
        );
    }

    #[test]
    fn prop_driver_form_cleans_to_input(
        username in username_strategy(),
        license in valid_license_strategy(),
        password in password_strategy(),
    ) {
        let form = DriverCreationForm {
            username,
            first_name: "Test first".to_string(),
            last_name: "Test last".to_string(),
            license_number: license,
            password1: password.clone(),
            password2: password,
        };

        let cleaned = form.clone().clean();
        prop_assert_eq!(cleaned, Ok(form));
    }
}

// ============================================================================
// Examples
// ============================================================================

#[test]
fn test_accepts_well_formed_license() {
    assert_eq!(validate_license_number("AAA12345"), Ok("AAA12345"));
}

#[test]
fn test_rejects_malformed_licenses() {
    let cases = [
        ("AAa12345", "First 3 characters should be uppercase letters"),
        ("AA12345", "License number should consist of 8 characters"),
        ("aaa12345", "First 3 characters should be uppercase letters"),
        ("AAA1234", "License number should consist of 8 characters"),
        ("AAA1234a", "Last 5 characters should be digits"),
        ("AAA123456", "License number should consist of 8 characters"),
    ];

    for (license, message) in cases {
        assert_eq!(validate_license_number(license), Err(message), "{}", license);
    }
}

#[test]
fn test_rejects_non_ascii_letters_and_digits() {
    // Eight characters, but not ASCII
    assert!(validate_license_number("ÄBC12345").is_err());
    assert!(validate_license_number("ABC1234٣").is_err());
}

#[test]
fn test_driver_form_with_valid_data() {
    let form = DriverCreationForm {
        username: "new_user".to_string(),
        first_name: "Test first".to_string(),
        last_name: "Test last".to_string(),
        license_number: "TES12345".to_string(),
        password1: "user12test".to_string(),
        password2: "user12test".to_string(),
    };

    assert_eq!(form.clone().clean(), Ok(form));
}

#[test]
fn test_driver_form_reports_license_error_on_field() {
    let form = DriverCreationForm {
        username: "new_user".to_string(),
        license_number: "TES1234".to_string(),
        password1: "user12test".to_string(),
        password2: "user12test".to_string(),
        ..DriverCreationForm::default()
    };

    let errors = form.clean().unwrap_err();
    assert_eq!(
        errors.field("license_number"),
        ["License number should consist of 8 characters".to_string()]
    );
    assert!(!errors.has("password2"));
}

#[test]
fn test_license_update_form() {
    let valid = DriverLicenseUpdateForm {
        license_number: "XYZ98765".to_string(),
    };
    assert_eq!(valid.clone().clean(), Ok(valid));

    let invalid = DriverLicenseUpdateForm {
        license_number: "XYZ9876A".to_string(),
    };
    let errors = invalid.clean().unwrap_err();
    assert_eq!(
        errors.field("license_number"),
        ["Last 5 characters should be digits".to_string()]
    );
}
