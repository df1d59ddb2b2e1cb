//! Form types submitted by the server-rendered pages
//!
//! Each form deserializes from a urlencoded body with missing fields
//! defaulting to empty values, and exposes `clean()`, which returns the
//! form unchanged when valid or the per-field error messages otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::validation::{license_number_field, not_blank, username_field, validate_password};

/// Key used for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "__all__";

// ============================================================================
// Form Errors
// ============================================================================

/// Error messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors with a single message on one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Messages for a field, empty when the field is valid
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        self.field(NON_FIELD_ERRORS)
    }

    pub fn has(&self, name: &str) -> bool {
        !self.field(name).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(value)` when no errors were collected
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Enter a valid value.".to_string());
                form_errors.add(field, message);
            }
        }
        form_errors
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

fn collect_errors<T: Validate>(form: &T) -> FormErrors {
    match form.validate() {
        Ok(()) => FormErrors::new(),
        Err(errors) => errors.into(),
    }
}

// ============================================================================
// Manufacturer
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ManufacturerForm {
    #[validate(custom = "not_blank")]
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub name: String,
    #[validate(custom = "not_blank")]
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub country: String,
}

impl ManufacturerForm {
    pub fn clean(self) -> Result<Self, FormErrors> {
        collect_errors(&self).into_result(self)
    }
}

// ============================================================================
// Car
// ============================================================================

/// Car form; `drivers` collects every repeated `drivers` key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CarForm {
    #[validate(custom = "not_blank")]
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub model: String,
    #[validate(required(message = "This field is required."))]
    pub manufacturer: Option<i64>,
    #[validate(length(min = 1, message = "This field is required."))]
    pub drivers: Vec<i64>,
}

impl CarForm {
    pub fn clean(mut self) -> Result<Self, FormErrors> {
        self.drivers.sort_unstable();
        self.drivers.dedup();
        collect_errors(&self).into_result(self)
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Sign-up form for a new driver account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DriverCreationForm {
    #[validate(custom = "username_field")]
    pub username: String,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,
    #[validate(custom = "license_number_field")]
    pub license_number: String,
    #[validate(custom = "not_blank")]
    pub password1: String,
    #[validate(custom = "not_blank")]
    pub password2: String,
}

impl DriverCreationForm {
    pub fn clean(self) -> Result<Self, FormErrors> {
        let mut errors = collect_errors(&self);

        if !self.password1.is_empty() && !self.password2.is_empty() {
            if self.password1 != self.password2 {
                errors.add("password2", "The two password fields didn't match.");
            } else if let Err(msg) = validate_password(&self.password2) {
                errors.add("password2", msg);
            }
        }

        errors.into_result(self)
    }
}

/// Form that only changes a driver's license number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DriverLicenseUpdateForm {
    #[validate(custom = "license_number_field")]
    pub license_number: String,
}

impl DriverLicenseUpdateForm {
    pub fn clean(self) -> Result<Self, FormErrors> {
        collect_errors(&self).into_result(self)
    }
}

// ============================================================================
// Authentication & Listing
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(custom = "not_blank")]
    pub username: String,
    #[validate(custom = "not_blank")]
    pub password: String,
    /// Local path to continue to after login
    pub next: String,
}

impl LoginForm {
    pub fn clean(self) -> Result<Self, FormErrors> {
        collect_errors(&self).into_result(self)
    }
}

/// Query string accepted by list pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub query: Option<String>,
    pub page: Option<u32>,
}

impl ListQuery {
    /// Trimmed search term, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}
