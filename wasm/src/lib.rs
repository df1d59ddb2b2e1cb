//! WebAssembly module for the Taxi Service
//!
//! Lets the driver forms validate input in the browser before submitting,
//! using the same rules the server applies.

use wasm_bindgen::prelude::*;

pub use shared::forms::*;
pub use shared::validation::*;

/// Validate a license number, returning it unchanged or throwing the
/// validation message
#[wasm_bindgen(js_name = validateLicenseNumber)]
pub fn validate_license(value: &str) -> Result<String, JsValue> {
    validate_license_number(value)
        .map(str::to_string)
        .map_err(JsValue::from_str)
}

/// Check a license number without throwing
#[wasm_bindgen(js_name = isValidLicenseNumber)]
pub fn is_valid_license_number(value: &str) -> bool {
    validate_license_number(value).is_ok()
}

/// Validate a driver creation form given as JSON.
///
/// Returns a JSON object mapping field names to error messages; the object
/// is empty when the form is valid.
#[wasm_bindgen(js_name = validateDriverForm)]
pub fn validate_driver_form(form_json: &str) -> Result<String, JsValue> {
    let form: DriverCreationForm = serde_json::from_str(form_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid form JSON: {}", e)))?;

    let errors = match form.clean() {
        Ok(_) => FormErrors::new(),
        Err(errors) => errors,
    };

    serde_json::to_string(&errors).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate a license update form given as JSON, same output as
/// [`validate_driver_form`]
#[wasm_bindgen(js_name = validateLicenseForm)]
pub fn validate_license_form(form_json: &str) -> Result<String, JsValue> {
    let form: DriverLicenseUpdateForm = serde_json::from_str(form_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid form JSON: {}", e)))?;

    let errors = form.clean().err().unwrap_or_default();

    serde_json::to_string(&errors).map_err(|e| JsValue::from_str(&e.to_string()))
}
